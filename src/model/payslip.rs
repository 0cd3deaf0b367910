use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A generated payslip row, persisted by the payroll generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Payslip {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub staff_id: u64,

    /// First day of the payslip month.
    #[schema(example = "2026-03-01", value_type = String, format = "date")]
    pub month: NaiveDate,

    #[schema(example = 31)]
    pub total_days: i32,

    #[schema(example = 28)]
    pub working_days: i32,

    #[schema(example = 2)]
    pub paid_leaves: i32,

    #[schema(example = 3)]
    pub unpaid_leaves: i32,

    #[schema(example = "9000.00", value_type = String)]
    pub base_salary: Decimal,

    #[schema(example = "870.97", value_type = String)]
    pub deduction_amount: Decimal,

    #[schema(example = "8129.03", value_type = String)]
    pub net_salary: Decimal,

    #[schema(example = "2026-04-01", value_type = String, format = "date")]
    pub generated_on: NaiveDate,
}
