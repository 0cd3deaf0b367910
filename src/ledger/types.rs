//! Shared types for the ledger and payroll computations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Errors raised by the ledger/payroll computations.
///
/// The computations themselves are total over stored data; these errors only
/// occur at the validation boundary (a new leave interval, a requested
/// payroll month).
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A leave period whose end date precedes its start date.
    #[error("invalid leave interval: end date {end} is before start date {start}")]
    InvalidInterval {
        /// First day of the period.
        start: NaiveDate,
        /// Last day of the period.
        end: NaiveDate,
    },

    /// A `(year, month)` pair that does not denote a calendar month.
    #[error("invalid payroll month: {year}-{month}")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month number (expected 1..=12).
        month: u32,
    },
}

/// A type alias for Results that return LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// A validated inclusive date interval for a leave period.
///
/// Construction rejects `end < start`, so an interval in hand always has a
/// positive day count. Stored rows that predate this check are consumed
/// tolerantly elsewhere via [`crate::model::leave::StaffLeave::total_days`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl LeaveInterval {
    /// Builds an interval, rejecting `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> LedgerResult<Self> {
        if end < start {
            return Err(LedgerError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the interval.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the interval.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, counting both endpoints.
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// One row of a staff member's ledger: a salary credit or a payment debit,
/// carrying the running balance after this transaction.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LedgerEntry {
    /// Transaction date (credits fall on the first of the accrued month).
    #[schema(example = "2026-03-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    /// Human-readable label ("Salary for March 2026", "Advance Payment").
    #[schema(example = "Salary for March 2026")]
    pub description: String,

    /// Amount credited to the staff member.
    #[schema(example = "9000.00", value_type = String)]
    pub credit: Decimal,

    /// Amount paid out to the staff member.
    #[schema(example = "0.00", value_type = String)]
    pub debit: Decimal,

    /// Balance after this transaction, over the full unfiltered history.
    #[schema(example = "9000.00", value_type = String)]
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn interval_accepts_single_day() {
        let interval = LeaveInterval::new(date(2026, 3, 5), date(2026, 3, 5)).unwrap();
        assert_eq!(interval.total_days(), 1);
    }

    #[test]
    fn interval_counts_both_endpoints() {
        let interval = LeaveInterval::new(date(2026, 3, 1), date(2026, 3, 5)).unwrap();
        assert_eq!(interval.total_days(), 5);
    }

    #[test]
    fn interval_rejects_inverted_dates() {
        let result = LeaveInterval::new(date(2026, 3, 5), date(2026, 3, 1));
        match result.unwrap_err() {
            LedgerError::InvalidInterval { start, end } => {
                assert_eq!(start, date(2026, 3, 5));
                assert_eq!(end, date(2026, 3, 1));
            }
            other => panic!("expected InvalidInterval, got {:?}", other),
        }
    }

    #[test]
    fn invalid_month_displays_pair() {
        let error = LedgerError::InvalidMonth { year: 2026, month: 13 };
        assert_eq!(error.to_string(), "invalid payroll month: 2026-13");
    }
}
