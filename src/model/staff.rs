use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "canteen_id": 1,
        "name": "Ramesh Kumar",
        "role": "Cook",
        "phone": "9876543210",
        "joining_date": "2025-04-01",
        "monthly_salary": "9000.00",
        "bank_account_no": "110023456789",
        "ifsc_code": "SBIN0001234",
        "is_active": true,
        "leaving_date": null
    })
)]
pub struct Staff {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1, nullable = true)]
    pub canteen_id: Option<u64>,

    #[schema(example = "Ramesh Kumar")]
    pub name: String,

    /// "Cook" or "Helper"
    #[schema(example = "Cook")]
    pub role: String,

    #[schema(example = "9876543210")]
    pub phone: String,

    #[schema(example = "2025-04-01", value_type = String, format = "date", nullable = true)]
    pub joining_date: Option<NaiveDate>,

    #[schema(example = "9000.00", value_type = String)]
    pub monthly_salary: Decimal,

    #[schema(example = "110023456789", nullable = true)]
    pub bank_account_no: Option<String>,

    #[schema(example = "SBIN0001234", nullable = true)]
    pub ifsc_code: Option<String>,

    #[schema(example = true)]
    pub is_active: bool,

    #[schema(example = "2026-06-30", value_type = String, format = "date", nullable = true)]
    pub leaving_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub enum StaffRole {
    Cook,
    Helper,
}

impl StaffRole {
    pub fn as_str(&self) -> &str {
        match self {
            StaffRole::Cook => "Cook",
            StaffRole::Helper => "Helper",
        }
    }
}
