//! Inclusive date ranges for projections and reports.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reports::ReportError;

/// An inclusive `[start, end]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub start: NaiveDate,
    /// Last day included.
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting one that ends before it starts.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds a range from optional request parameters.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::MissingDateRange` if either bound is absent.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, ReportError> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Err(ReportError::MissingDateRange),
        }
    }

    /// Returns true if `date` falls within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::new(date(1, 1), date(1, 1)).unwrap();
        assert!(range.contains(date(1, 1)));
        assert!(!range.contains(date(1, 2)));
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = DateRange::new(date(2, 1), date(1, 1)).unwrap_err();
        assert!(matches!(err, ReportError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_missing_bound_rejected() {
        assert!(matches!(
            DateRange::from_bounds(Some(date(1, 1)), None),
            Err(ReportError::MissingDateRange)
        ));
        assert!(matches!(
            DateRange::from_bounds(None, None),
            Err(ReportError::MissingDateRange)
        ));
    }
}
