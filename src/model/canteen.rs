use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Factory Mess",
        "location": "Plot 12, GIDC",
        "billing_type": "DAILY",
        "daily_lunch_count": 40,
        "daily_dinner_count": 35
    })
)]
pub struct Canteen {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Factory Mess")]
    pub name: String,

    #[schema(example = "Plot 12, GIDC")]
    pub location: String,

    /// "DAILY" (per-day payment tracking) or "MONTHLY" (fixed billing)
    #[schema(example = "DAILY")]
    pub billing_type: String,

    #[schema(example = 40)]
    pub daily_lunch_count: i32,

    #[schema(example = 35)]
    pub daily_dinner_count: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillingType {
    Daily,
    Monthly,
}

impl BillingType {
    pub fn as_str(&self) -> &str {
        match self {
            BillingType::Daily => "DAILY",
            BillingType::Monthly => "MONTHLY",
        }
    }
}
