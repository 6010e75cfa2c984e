use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use fractic_server_error::ServerError;

use crate::{
    data::models::{
        iso_date_model::ISODateModel,
        timestamp_model::{earliest_local, latest_local},
    },
    entities::{Comparison, Constraint, FieldValue, FilterConfig, SortField},
    errors::InvalidIsoDate,
};

/// Field every dated collection is range-filtered on.
pub const DATE_FIELD: &str = "date";

/// Translates a filter configuration into store constraints.
///
/// Date predicates always come before the ordering directive. The search
/// term is never turned into a predicate: the store only supports prefix and
/// equality matching, so substring search happens client-side on the loaded
/// records (see [`crate::window::matches_search`]).
pub struct ConstraintBuilder<'a, F: SortField> {
    config: &'a FilterConfig<F>,
}

impl<'a, F: SortField> ConstraintBuilder<'a, F> {
    pub fn new(config: &'a FilterConfig<F>) -> Self {
        Self { config }
    }

    pub fn build(&self) -> Result<Vec<Constraint>, ServerError> {
        let mut constraints = Vec::new();

        // Partial ranges are ignored, not half-applied.
        if let Some(range) = self.config.date_filter.as_ref().filter(|d| d.is_complete()) {
            let start: NaiveDate = range.start.parse::<ISODateModel>()?.into();
            let end: NaiveDate = range.end.parse::<ISODateModel>()?.into();
            constraints.push(Constraint::Where {
                field: DATE_FIELD,
                op: Comparison::Gte,
                value: FieldValue::Timestamp(start_of_day(start)?),
            });
            constraints.push(Constraint::Where {
                field: DATE_FIELD,
                op: Comparison::Lte,
                value: FieldValue::Timestamp(end_of_day(end)?),
            });
        }

        if let Some(field) = self.config.sort_field {
            constraints.push(Constraint::OrderBy {
                field: field.field_name(),
                direction: self.config.sort_direction.unwrap_or_default(),
            });
        }

        Ok(constraints)
    }
}

/// 00:00:00.000 local time on the given day.
pub fn start_of_day(day: NaiveDate) -> Result<DateTime<Utc>, ServerError> {
    start_of_day_in(&Local, day)
}

/// 23:59:59.999 local time on the given day.
pub fn end_of_day(day: NaiveDate) -> Result<DateTime<Utc>, ServerError> {
    end_of_day_in(&Local, day)
}

/// First instant of `day` in `tz`. Where a DST jump skips midnight this is
/// the first wall-clock time that exists.
pub fn start_of_day_in<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Result<DateTime<Utc>, ServerError> {
    day.and_hms_milli_opt(0, 0, 0, 0)
        .and_then(|t| earliest_local(tz, t))
        .ok_or_else(|| InvalidIsoDate::new(&day.to_string()))
}

pub fn end_of_day_in<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Result<DateTime<Utc>, ServerError> {
    day.and_hms_milli_opt(23, 59, 59, 999)
        .and_then(|t| latest_local(tz, t))
        .ok_or_else(|| InvalidIsoDate::new(&day.to_string()))
}
