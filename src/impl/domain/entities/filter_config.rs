use chrono::{Datelike as _, Local, NaiveDate};

use super::sort_field::SortField;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Inclusive calendar-day range, as `YYYY-MM-DD` strings. An empty bound
/// disables date filtering entirely.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Default)]
pub struct DateFilter {
    pub start: String,
    pub end: String,
}

impl DateFilter {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.start.is_empty() && !self.end.is_empty()
    }

    /// First to last day of the current local month.
    pub fn current_month() -> Self {
        Self::month_of(Local::now().date_naive())
    }

    pub fn month_of(day: NaiveDate) -> Self {
        let first = day.with_day(1).unwrap_or(day);
        let next_month_first = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        };
        let last = next_month_first
            .and_then(|d| d.pred_opt())
            .unwrap_or(first);
        Self {
            start: first.format("%Y-%m-%d").to_string(),
            end: last.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FilterConfig<F: SortField> {
    pub sort_field: Option<F>,
    pub sort_direction: Option<SortDirection>,
    /// Matched client-side against the loaded records only.
    pub search_term: Option<String>,
    pub date_filter: Option<DateFilter>,
}

/// The subset of a filter configuration whose change invalidates the loaded
/// pages. Sort direction is not part of it.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct FilterIdentity<F: SortField> {
    sort_field: Option<F>,
    search_term: Option<String>,
    date_start: Option<String>,
    date_end: Option<String>,
}

impl<F: SortField> Default for FilterConfig<F> {
    fn default() -> Self {
        Self {
            sort_field: None,
            sort_direction: None,
            search_term: None,
            date_filter: None,
        }
    }
}

impl<F: SortField> FilterConfig<F> {
    pub fn sorted_by(field: F) -> Self {
        Self {
            sort_field: Some(field),
            ..Default::default()
        }
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.sort_direction = Some(direction);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_date_filter(mut self, date_filter: DateFilter) -> Self {
        self.date_filter = Some(date_filter);
        self
    }

    pub fn identity(&self) -> FilterIdentity<F> {
        FilterIdentity {
            sort_field: self.sort_field,
            search_term: self.search_term.clone(),
            date_start: self.date_filter.as_ref().map(|d| d.start.clone()),
            date_end: self.date_filter.as_ref().map(|d| d.end.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::LedgerSortField;

    #[test]
    fn sort_direction_is_not_part_of_identity() {
        let a = FilterConfig::sorted_by(LedgerSortField::Date);
        let b = a.clone().with_direction(SortDirection::Asc);
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn search_and_dates_are_part_of_identity() {
        let a = FilterConfig::sorted_by(LedgerSortField::Date);
        assert_ne!(a.identity(), a.clone().with_search("ram").identity());
        assert_ne!(
            a.identity(),
            a.clone()
                .with_date_filter(DateFilter::new("2024-03-01", "2024-03-31"))
                .identity()
        );
        assert_ne!(
            a.identity(),
            FilterConfig::sorted_by(LedgerSortField::TotalAmount).identity()
        );
    }

    #[test]
    fn month_range_covers_whole_month() {
        let feb = DateFilter::month_of(NaiveDate::from_ymd_opt(2024, 2, 17).unwrap());
        assert_eq!(feb, DateFilter::new("2024-02-01", "2024-02-29"));
        let dec = DateFilter::month_of(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(dec, DateFilter::new("2023-12-01", "2023-12-31"));
    }
}
