use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SalaryPayment {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub staff_id: u64,

    #[schema(example = "2026-03-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    /// "Monthly", "Advance" or "Bonus"
    #[schema(example = "Advance")]
    pub payment_type: String,

    #[schema(example = "2000.00", value_type = String)]
    pub amount: Decimal,

    #[schema(example = "Against March salary", nullable = true)]
    pub notes: Option<String>,
}

impl SalaryPayment {
    /// Display label for ledger rows.
    pub fn type_label(&self) -> &str {
        match self.payment_type.as_str() {
            "Monthly" => "Monthly Salary Payment",
            "Advance" => "Advance Payment",
            "Bonus" => "Bonus",
            other => other,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub enum PaymentType {
    Monthly,
    Advance,
    Bonus,
}

impl PaymentType {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentType::Monthly => "Monthly",
            PaymentType::Advance => "Advance",
            PaymentType::Bonus => "Bonus",
        }
    }
}
