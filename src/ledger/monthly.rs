//! Month-specific payroll computation used for formal payslip generation.
//!
//! Unlike the ledger accrual (which spreads salary over a fixed 30 days),
//! payslips divide by the actual number of days in the month. The two
//! divisor policies serve different report types and are kept separate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::ledger::month_last;
use crate::ledger::types::{LedgerError, LedgerResult};
use crate::model::leave::StaffLeave;
use crate::model::staff::Staff;

/// The computed payroll figures for one staff member and one month.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PayrollLine {
    #[schema(example = 1)]
    pub staff_id: u64,

    /// First day of the payslip month.
    #[schema(example = "2026-02-01", value_type = String, format = "date")]
    pub month: NaiveDate,

    /// Calendar days in the month (28-31).
    #[schema(example = 28)]
    pub total_days: i64,

    /// Days not lost to unpaid leave.
    #[schema(example = 25)]
    pub working_days: i64,

    #[schema(example = 2)]
    pub paid_leaves: i64,

    #[schema(example = 3)]
    pub unpaid_leaves: i64,

    #[schema(example = "9000.00", value_type = String)]
    pub base_salary: Decimal,

    /// `base_salary / total_days`, calendar-accurate.
    #[schema(example = "321.43", value_type = String)]
    pub per_day_salary: Decimal,

    #[schema(example = "964.29", value_type = String)]
    pub deduction_amount: Decimal,

    #[schema(example = "8035.71", value_type = String)]
    pub net_salary: Decimal,
}

/// Computes the payslip figures for `(year, month)`.
///
/// Leave periods fully contained in the month are split into paid and
/// unpaid day counts; only unpaid days deduct, at `base_salary` divided by
/// the month's actual day count. Returns an error for a `(year, month)`
/// pair that is not a calendar month.
pub fn compute_month_payroll(
    staff: &Staff,
    leaves: &[StaffLeave],
    year: i32,
    month: u32,
) -> LedgerResult<PayrollLine> {
    let month_start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(LedgerError::InvalidMonth { year, month })?;
    let month_end = month_last(month_start);
    let total_days = (month_end - month_start).num_days() + 1;

    let mut paid_leaves = 0i64;
    let mut unpaid_leaves = 0i64;
    for leave in leaves {
        if leave.start_date >= month_start && leave.end_date <= month_end {
            if leave.is_paid_leave {
                paid_leaves += leave.total_days();
            } else {
                unpaid_leaves += leave.total_days();
            }
        }
    }

    let per_day_salary = staff.monthly_salary / Decimal::from(total_days);
    let deduction_amount = (per_day_salary * Decimal::from(unpaid_leaves)).round_dp(2);
    let net_salary = (staff.monthly_salary - per_day_salary * Decimal::from(unpaid_leaves))
        .round_dp(2);

    Ok(PayrollLine {
        staff_id: staff.id,
        month: month_start,
        total_days,
        working_days: total_days - unpaid_leaves,
        paid_leaves,
        unpaid_leaves,
        base_salary: staff.monthly_salary,
        per_day_salary: per_day_salary.round_dp(2),
        deduction_amount,
        net_salary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn staff(salary: &str) -> Staff {
        Staff {
            id: 7,
            canteen_id: None,
            name: "Suresh".to_string(),
            role: "Helper".to_string(),
            phone: "9000000000".to_string(),
            joining_date: Some(date(2025, 1, 1)),
            monthly_salary: dec(salary),
            bank_account_no: None,
            ifsc_code: None,
            is_active: true,
            leaving_date: None,
        }
    }

    fn leave(start: NaiveDate, end: NaiveDate, is_paid_leave: bool) -> StaffLeave {
        StaffLeave {
            id: 1,
            staff_id: 7,
            start_date: start,
            end_date: end,
            reason: None,
            is_paid_leave,
        }
    }

    #[test]
    fn uses_calendar_day_count_per_month() {
        let s = staff("9300.00");
        let jan = compute_month_payroll(&s, &[], 2026, 1).unwrap();
        let feb = compute_month_payroll(&s, &[], 2026, 2).unwrap();

        assert_eq!(jan.total_days, 31);
        assert_eq!(feb.total_days, 28);
        assert_eq!(jan.per_day_salary, dec("300.00"));
        assert_eq!(feb.per_day_salary, dec("332.14"));
    }

    #[test]
    fn identical_unpaid_days_yield_different_nets_across_months() {
        // Confirms the calendar divisor rather than the ledger's fixed 30.
        let s = staff("9300.00");
        let one_day_jan = vec![leave(date(2026, 1, 10), date(2026, 1, 10), false)];
        let one_day_feb = vec![leave(date(2026, 2, 10), date(2026, 2, 10), false)];

        let jan = compute_month_payroll(&s, &one_day_jan, 2026, 1).unwrap();
        let feb = compute_month_payroll(&s, &one_day_feb, 2026, 2).unwrap();

        assert_eq!(jan.net_salary, dec("9000.00"));
        assert_eq!(feb.net_salary, dec("8967.86"));
        assert_ne!(jan.per_day_salary, feb.per_day_salary);
    }

    #[test]
    fn paid_leave_deducts_nothing() {
        let s = staff("8400.00");
        let leaves = vec![leave(date(2026, 2, 2), date(2026, 2, 6), true)];
        let line = compute_month_payroll(&s, &leaves, 2026, 2).unwrap();

        assert_eq!(line.paid_leaves, 5);
        assert_eq!(line.unpaid_leaves, 0);
        assert_eq!(line.deduction_amount, Decimal::ZERO);
        assert_eq!(line.net_salary, dec("8400.00"));
        assert_eq!(line.working_days, 28);
    }

    #[test]
    fn unpaid_leave_reduces_working_days_and_net() {
        let s = staff("8400.00");
        let leaves = vec![leave(date(2026, 2, 2), date(2026, 2, 4), false)];
        let line = compute_month_payroll(&s, &leaves, 2026, 2).unwrap();

        // 8400 / 28 = 300 per day, 3 unpaid days.
        assert_eq!(line.unpaid_leaves, 3);
        assert_eq!(line.working_days, 25);
        assert_eq!(line.deduction_amount, dec("900.00"));
        assert_eq!(line.net_salary, dec("7500.00"));
    }

    #[test]
    fn leave_outside_the_month_is_ignored() {
        let s = staff("8400.00");
        let leaves = vec![leave(date(2026, 1, 28), date(2026, 2, 3), false)];
        let line = compute_month_payroll(&s, &leaves, 2026, 2).unwrap();

        assert_eq!(line.unpaid_leaves, 0);
        assert_eq!(line.net_salary, dec("8400.00"));
    }

    #[test]
    fn leap_february_has_29_days() {
        let s = staff("8700.00");
        let line = compute_month_payroll(&s, &[], 2028, 2).unwrap();

        assert_eq!(line.total_days, 29);
        assert_eq!(line.per_day_salary, dec("300.00"));
    }

    #[test]
    fn rejects_out_of_range_month() {
        let s = staff("8400.00");
        let result = compute_month_payroll(&s, &[], 2026, 13);
        match result.unwrap_err() {
            LedgerError::InvalidMonth { year, month } => {
                assert_eq!(year, 2026);
                assert_eq!(month, 13);
            }
            other => panic!("expected InvalidMonth, got {:?}", other),
        }
    }
}
