//! Ledger accrual and payroll computations.
//!
//! Pure functions over already-loaded records; the API layer owns loading
//! and persistence. Two deliberately distinct per-day salary policies live
//! here: [`accrual::compute_ledger`] divides by a fixed 30,
//! [`monthly::compute_month_payroll`] divides by the calendar month length.

pub mod accrual;
pub mod monthly;
pub mod types;

pub use accrual::compute_ledger;
pub use monthly::{PayrollLine, compute_month_payroll};
pub use types::{LedgerEntry, LedgerError, LedgerResult, LeaveInterval};

use chrono::{Datelike, Months, NaiveDate};

/// First day of `date`'s month.
pub fn month_first(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("day 1 exists in every month")
}

/// Last day of `date`'s month.
pub fn month_last(date: NaiveDate) -> NaiveDate {
    month_first(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .expect("month end stays within the chrono date range")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_first_truncates_to_day_one() {
        assert_eq!(month_first(date(2026, 3, 17)), date(2026, 3, 1));
        assert_eq!(month_first(date(2026, 3, 1)), date(2026, 3, 1));
    }

    #[test]
    fn month_last_handles_varying_lengths() {
        assert_eq!(month_last(date(2026, 1, 1)), date(2026, 1, 31));
        assert_eq!(month_last(date(2026, 2, 1)), date(2026, 2, 28));
        assert_eq!(month_last(date(2026, 2, 17)), date(2026, 2, 28));
        assert_eq!(month_last(date(2028, 2, 1)), date(2028, 2, 29));
        assert_eq!(month_last(date(2026, 12, 1)), date(2026, 12, 31));
    }
}
