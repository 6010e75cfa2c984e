use chrono::{DateTime, Utc};

use super::filter_config::SortDirection;

#[derive(Debug, PartialEq, Clone)]
pub enum FieldValue {
    Timestamp(DateTime<Utc>),
    Number(f64),
    Text(String),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Comparison {
    Eq,
    Gte,
    Lte,
}

impl Comparison {
    pub fn is_range(&self) -> bool {
        matches!(self, Comparison::Gte | Comparison::Lte)
    }
}

/// Primitive understood by the backing store. Predicates must precede the
/// ordering directive.
#[derive(Debug, PartialEq, Clone)]
pub enum Constraint {
    Where {
        field: &'static str,
        op: Comparison,
        value: FieldValue,
    },
    OrderBy {
        field: &'static str,
        direction: SortDirection,
    },
}
