use crate::{
    auth::auth::AuthUser,
    ledger::{month_first, month_last},
    model::canteen::Canteen,
};
use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    #[schema(example = "March 2026")]
    pub current_month: String,
    #[schema(example = 3)]
    pub total_canteens: i64,
    #[schema(example = 12)]
    pub total_staff: i64,
    /// Expenses dated inside the current month.
    #[schema(example = "45200.00", value_type = String)]
    pub monthly_expenses_sum: Decimal,
    /// Salary payments dated inside the current month.
    #[schema(example = "38000.00", value_type = String)]
    pub monthly_payments_sum: Decimal,
    /// Lifetime advances handed out.
    #[schema(example = "12000.00", value_type = String)]
    pub total_advance_paid: Decimal,
    pub all_canteens: Vec<Canteen>,
}

/// Home dashboard: this month's money movement and the canteen registry.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, body = DashboardResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn home_dashboard(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let today = Local::now().date_naive();
    let first_day = month_first(today);
    let last_day = month_last(today);

    let monthly_expenses_sum = sqlx::query_scalar::<_, Option<Decimal>>(
        "SELECT SUM(amount) FROM expenses WHERE date >= ? AND date <= ?",
    )
    .bind(first_day)
    .bind(last_day)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to sum monthly expenses");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?
    .unwrap_or(Decimal::ZERO);

    let monthly_payments_sum = sqlx::query_scalar::<_, Option<Decimal>>(
        "SELECT SUM(amount) FROM salary_payments WHERE date >= ? AND date <= ?",
    )
    .bind(first_day)
    .bind(last_day)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to sum monthly payments");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?
    .unwrap_or(Decimal::ZERO);

    let total_advance_paid = sqlx::query_scalar::<_, Option<Decimal>>(
        "SELECT SUM(amount) FROM salary_payments WHERE payment_type = 'Advance'",
    )
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to sum advances");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?
    .unwrap_or(Decimal::ZERO);

    let total_canteens = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM canteens")
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to count canteens");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let total_staff =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM staff WHERE is_active = TRUE")
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to count staff");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    let all_canteens = sqlx::query_as::<_, Canteen>("SELECT * FROM canteens ORDER BY name")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch canteens");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(DashboardResponse {
        current_month: today.format("%B %Y").to_string(),
        total_canteens,
        total_staff,
        monthly_expenses_sum,
        monthly_payments_sum,
        total_advance_paid,
        all_canteens,
    }))
}
