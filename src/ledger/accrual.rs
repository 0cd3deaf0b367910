//! The staff ledger accrual computation.
//!
//! Given a staff member's employment start, their leave periods and the
//! payments made to them, this module produces the chronological list of
//! ledger transactions (salary credits, payment debits) with a running
//! balance. The reporting endpoints render the result as a table.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::ledger::{month_first, month_last};
use crate::ledger::types::LedgerEntry;
use crate::model::leave::StaffLeave;
use crate::model::payment::SalaryPayment;
use crate::model::staff::Staff;

/// Fixed accrual divisor: one month of salary is spread over 30 days
/// regardless of the calendar month length. Formal payslips use the
/// calendar-accurate divisor instead (see [`crate::ledger::monthly`]);
/// the two policies are intentionally distinct.
const ACCRUAL_DIVISOR: u32 = 30;

struct Draft {
    date: NaiveDate,
    /// Credits sort before debits on the same date.
    side: u8,
    description: String,
    credit: Decimal,
    debit: Decimal,
}

/// Computes the ordered, balanced transaction history for one staff member.
///
/// Accrual runs from the staff member's joining date (or January 1 of
/// `today`'s year when unset) through the first day of `today`'s month,
/// inclusive. One salary credit is emitted per month, reduced by unpaid
/// leave days at `monthly_salary / 30` per day; one debit is emitted per
/// payment.
///
/// `filter_start`/`filter_end` operate in carried-forward balance mode:
/// balances are accumulated over the full history first and the bounds only
/// project the returned rows, so a start filter does not reset the opening
/// balance to zero.
///
/// `today` is injected rather than read from the clock so callers and tests
/// control the accrual window.
pub fn compute_ledger(
    staff: &Staff,
    leaves: &[StaffLeave],
    payments: &[SalaryPayment],
    today: NaiveDate,
    filter_start: Option<NaiveDate>,
    filter_end: Option<NaiveDate>,
) -> Vec<LedgerEntry> {
    let window_start = staff.joining_date.unwrap_or_else(|| {
        NaiveDate::from_ymd_opt(today.year(), 1, 1).expect("January 1 exists in every year")
    });

    let mut drafts: Vec<Draft> = Vec::with_capacity(payments.len() + 12);

    for payment in payments {
        let description = match payment.notes.as_deref() {
            Some(notes) if !notes.trim().is_empty() => {
                format!("{} - {}", payment.type_label(), notes.trim())
            }
            _ => payment.type_label().to_string(),
        };
        drafts.push(Draft {
            date: payment.date,
            side: 1,
            description,
            credit: Decimal::ZERO,
            debit: payment.amount,
        });
    }

    let daily_rate = staff.monthly_salary / Decimal::from(ACCRUAL_DIVISOR);

    let mut cursor = month_first(window_start);
    let current_month = month_first(today);
    while cursor <= current_month {
        let month_end = month_last(cursor);

        let unpaid_days: i64 = leaves
            .iter()
            .filter(|l| !l.is_paid_leave && l.start_date >= cursor && l.end_date <= month_end)
            .map(StaffLeave::total_days)
            .sum();

        let deduction = daily_rate * Decimal::from(unpaid_days);
        let credit = (staff.monthly_salary - deduction).round_dp(2);

        drafts.push(Draft {
            date: cursor,
            side: 0,
            description: format!("Salary for {}", cursor.format("%B %Y")),
            credit,
            debit: Decimal::ZERO,
        });

        cursor = cursor
            .checked_add_months(Months::new(1))
            .expect("accrual window stays within the chrono date range");
    }

    drafts.sort_by_key(|d| (d.date, d.side));

    let mut balance = Decimal::ZERO;
    let mut entries: Vec<LedgerEntry> = Vec::with_capacity(drafts.len());
    for draft in drafts {
        balance += draft.credit - draft.debit;
        entries.push(LedgerEntry {
            date: draft.date,
            description: draft.description,
            credit: draft.credit,
            debit: draft.debit,
            balance,
        });
    }

    if filter_start.is_some() || filter_end.is_some() {
        entries.retain(|e| {
            filter_start.is_none_or(|s| e.date >= s) && filter_end.is_none_or(|f| e.date <= f)
        });
    }

    entries
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

    fn staff(salary: &str, joining_date: Option<NaiveDate>) -> Staff {
        Staff {
            id: 1,
            canteen_id: Some(1),
            name: "Ramesh Kumar".to_string(),
            role: "Cook".to_string(),
            phone: "9876543210".to_string(),
            joining_date,
            monthly_salary: dec(salary),
            bank_account_no: None,
            ifsc_code: None,
            is_active: true,
            leaving_date: None,
        }
    }

    fn leave(
        start: NaiveDate,
        end: NaiveDate,
        is_paid_leave: bool,
    ) -> StaffLeave {
        StaffLeave {
            id: 1,
            staff_id: 1,
            start_date: start,
            end_date: end,
            reason: None,
            is_paid_leave,
        }
    }

    fn payment(on: NaiveDate, amount: &str, payment_type: &str) -> SalaryPayment {
        SalaryPayment {
            id: 1,
            staff_id: 1,
            date: on,
            payment_type: payment_type.to_string(),
            amount: dec(amount),
            notes: None,
        }
    }

    #[test]
    fn no_leaves_credits_full_salary_each_month() {
        let s = staff("9000.00", Some(date(2026, 3, 15)));
        let entries = compute_ledger(&s, &[], &[], date(2026, 6, 20), None, None);

        // March through June inclusive: 4 credit rows, no debits.
        assert_eq!(entries.len(), 4);
        for entry in &entries {
            assert_eq!(entry.credit, dec("9000.00"));
            assert_eq!(entry.debit, Decimal::ZERO);
        }
        assert_eq!(entries[0].date, date(2026, 3, 1));
        assert_eq!(entries[3].date, date(2026, 6, 1));
        assert_eq!(entries[3].balance, dec("36000.00"));
    }

    #[test]
    fn missing_joining_date_accrues_from_january_first() {
        let s = staff("5000.00", None);
        let entries = compute_ledger(&s, &[], &[], date(2026, 3, 10), None, None);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].date, date(2026, 1, 1));
        assert_eq!(entries[0].description, "Salary for January 2026");
    }

    #[test]
    fn unpaid_leave_deducts_at_one_thirtieth_per_day() {
        // 5-day unpaid leave inside April, salary 3000: rate 100/day, credit 2500.
        let s = staff("3000.00", Some(date(2026, 4, 1)));
        let leaves = vec![leave(date(2026, 4, 10), date(2026, 4, 14), false)];
        let entries = compute_ledger(&s, &leaves, &[], date(2026, 4, 30), None, None);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].credit, dec("2500.00"));
    }

    #[test]
    fn paid_leave_does_not_reduce_salary() {
        let s = staff("3000.00", Some(date(2026, 4, 1)));
        let leaves = vec![leave(date(2026, 4, 10), date(2026, 4, 14), true)];
        let entries = compute_ledger(&s, &leaves, &[], date(2026, 4, 30), None, None);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].credit, dec("3000.00"));
    }

    #[test]
    fn leave_spanning_two_months_is_counted_in_neither() {
        // Containment rule: both endpoints must fall inside the month.
        let s = staff("3000.00", Some(date(2026, 4, 1)));
        let leaves = vec![leave(date(2026, 4, 28), date(2026, 5, 2), false)];
        let entries = compute_ledger(&s, &leaves, &[], date(2026, 5, 31), None, None);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].credit, dec("3000.00"));
        assert_eq!(entries[1].credit, dec("3000.00"));
    }

    #[test]
    fn payments_appear_as_debits_with_type_label() {
        let s = staff("9000.00", Some(date(2026, 3, 1)));
        let payments = vec![payment(date(2026, 3, 10), "2000.00", "Advance")];
        let entries = compute_ledger(&s, &[], &payments, date(2026, 3, 31), None, None);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].description, "Advance Payment");
        assert_eq!(entries[1].debit, dec("2000.00"));
        assert_eq!(entries[1].balance, dec("7000.00"));
    }

    #[test]
    fn payment_notes_are_appended_to_the_label() {
        let s = staff("9000.00", Some(date(2026, 3, 1)));
        let mut p = payment(date(2026, 3, 10), "2000.00", "Bonus");
        p.notes = Some("Diwali".to_string());
        let entries = compute_ledger(&s, &[], &[p], date(2026, 3, 31), None, None);

        assert_eq!(entries[1].description, "Bonus - Diwali");
    }

    #[test]
    fn credits_sort_before_debits_on_the_same_date() {
        let s = staff("9000.00", Some(date(2026, 3, 1)));
        let payments = vec![payment(date(2026, 4, 1), "9000.00", "Monthly")];
        let entries = compute_ledger(&s, &[], &payments, date(2026, 4, 30), None, None);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].date, date(2026, 4, 1));
        assert_eq!(entries[1].credit, dec("9000.00"));
        assert_eq!(entries[2].date, date(2026, 4, 1));
        assert_eq!(entries[2].debit, dec("9000.00"));
        assert_eq!(entries[2].balance, dec("9000.00"));
    }

    #[test]
    fn running_balance_equals_credits_minus_debits() {
        let s = staff("7500.00", Some(date(2026, 1, 20)));
        let leaves = vec![
            leave(date(2026, 2, 3), date(2026, 2, 5), false),
            leave(date(2026, 3, 1), date(2026, 3, 1), true),
        ];
        let payments = vec![
            payment(date(2026, 2, 7), "3000.00", "Advance"),
            payment(date(2026, 3, 2), "7500.00", "Monthly"),
        ];
        let entries = compute_ledger(&s, &leaves, &payments, date(2026, 3, 15), None, None);

        let credits: Decimal = entries.iter().map(|e| e.credit).sum();
        let debits: Decimal = entries.iter().map(|e| e.debit).sum();
        assert_eq!(entries.last().unwrap().balance, credits - debits);
    }

    #[test]
    fn filter_projects_rows_without_changing_balances() {
        let s = staff("9000.00", Some(date(2026, 1, 1)));
        let payments = vec![payment(date(2026, 2, 15), "4000.00", "Advance")];
        let today = date(2026, 4, 10);

        let full = compute_ledger(&s, &[], &payments, today, None, None);
        let filtered = compute_ledger(
            &s,
            &[],
            &payments,
            today,
            Some(date(2026, 3, 1)),
            Some(date(2026, 4, 30)),
        );

        // Surviving rows carry the same balances as in the full history;
        // the opening balance is carried forward, not reset.
        assert_eq!(filtered.len(), 2);
        for entry in &filtered {
            let twin = full.iter().find(|e| e.date == entry.date).unwrap();
            assert_eq!(entry.balance, twin.balance);
        }
        assert_eq!(filtered[0].balance, dec("23000.00"));
    }

    #[test]
    fn fractional_rate_rounds_to_two_decimals() {
        // 1000 / 30 * 5 = 166.66..., credit 833.33 after banker's rounding.
        let s = staff("1000.00", Some(date(2026, 4, 1)));
        let leaves = vec![leave(date(2026, 4, 6), date(2026, 4, 10), false)];
        let entries = compute_ledger(&s, &leaves, &[], date(2026, 4, 30), None, None);

        assert_eq!(entries[0].credit, dec("833.33"));
    }
}
