use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One service/payment entry per canteen per date (unique together).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct DailyEntry {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub canteen_id: u64,

    #[schema(example = "2026-03-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = 40)]
    pub lunch_qty: i32,

    #[schema(example = 35)]
    pub dinner_qty: i32,

    #[schema(example = 10)]
    pub nasta_qty: i32,

    #[schema(example = 20)]
    pub tea_qty: i32,

    #[schema(example = 30)]
    pub normal_token_qty: i32,

    #[schema(example = 5)]
    pub special_token_qty: i32,

    #[schema(example = 2)]
    pub guest_token_qty: i32,

    #[schema(example = "1200.00", value_type = String)]
    pub cash_received: Decimal,

    #[schema(example = "800.00", value_type = String)]
    pub online_received: Decimal,
}
