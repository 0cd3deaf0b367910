use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Expense {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1, nullable = true)]
    pub canteen_id: Option<u64>,

    #[schema(example = "2026-03-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    /// Kirana, Gas, Vegetables, Milk, Auto, Wood or Other
    #[schema(example = "Vegetables")]
    pub category: String,

    #[schema(example = "5kg Tomato")]
    pub description: String,

    #[schema(example = "180.00", value_type = String)]
    pub amount: Decimal,

    #[schema(example = "5.00", value_type = String, nullable = true)]
    pub quantity: Option<Decimal>,

    /// "Pending", "Cash" or "Online"
    #[schema(example = "Cash")]
    pub payment_mode: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub enum ExpenseCategory {
    Kirana,
    Gas,
    Vegetables,
    Milk,
    Auto,
    Wood,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ExpenseCategory::Kirana => "Kirana",
            ExpenseCategory::Gas => "Gas",
            ExpenseCategory::Vegetables => "Vegetables",
            ExpenseCategory::Milk => "Milk",
            ExpenseCategory::Auto => "Auto",
            ExpenseCategory::Wood => "Wood",
            ExpenseCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub enum PaymentMode {
    Pending,
    Cash,
    Online,
}

impl PaymentMode {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMode::Pending => "Pending",
            PaymentMode::Cash => "Cash",
            PaymentMode::Online => "Online",
        }
    }
}
