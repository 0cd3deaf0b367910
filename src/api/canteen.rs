use crate::{
    auth::auth::AuthUser,
    model::canteen::{BillingType, Canteen},
    model::expense::Expense,
    utils::billing_cache,
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use std::collections::HashMap;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateCanteen {
    #[schema(example = "Factory Mess")]
    pub name: String,
    #[schema(example = "Plot 12, GIDC")]
    pub location: String,
    #[schema(example = "DAILY")]
    pub billing_type: BillingType,
    #[schema(example = 40)]
    pub daily_lunch_count: Option<i32>,
    #[schema(example = 35)]
    pub daily_dinner_count: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct CanteenSummary {
    pub canteen: Canteen,
    #[schema(example = "152000.00", value_type = String)]
    pub total_income: Decimal,
    #[schema(example = "98000.00", value_type = String)]
    pub total_expense: Decimal,
    #[schema(example = 4)]
    pub staff_count: i64,
    pub recent_expenses: Vec<Expense>,
}

/// Columns the dynamic update endpoint may touch.
const UPDATE_COLUMNS: &[&str] = &[
    "name",
    "location",
    "billing_type",
    "daily_lunch_count",
    "daily_dinner_count",
];

/// Create Canteen
#[utoipa::path(
    post,
    path = "/api/v1/canteen",
    request_body = CreateCanteen,
    responses(
        (status = 201, description = "Canteen created"),
        (status = 409, description = "Canteen name already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Canteen"
)]
pub async fn create_canteen(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateCanteen>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO canteens
        (name, location, billing_type, daily_lunch_count, daily_dinner_count)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.name.trim())
    .bind(&payload.location)
    .bind(payload.billing_type.as_str())
    .bind(payload.daily_lunch_count.unwrap_or(0))
    .bind(payload.daily_dinner_count.unwrap_or(0))
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(res) => {
            billing_cache::store(res.last_insert_id(), payload.billing_type.as_str()).await;
            Ok(HttpResponse::Created().json(json!({
                "message": "Canteen created successfully"
            })))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "A canteen with this name already exists"
                    })));
                }
            }

            error!(error = %e, "Failed to create canteen");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// List Canteens
///
/// The registry is small; the full list is returned ordered by name, as the
/// dashboard renders it.
#[utoipa::path(
    get,
    path = "/api/v1/canteen",
    responses(
        (status = 200, description = "All canteens", body = [Canteen])
    ),
    security(("bearer_auth" = [])),
    tag = "Canteen"
)]
pub async fn list_canteens(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let canteens =
        sqlx::query_as::<_, Canteen>("SELECT * FROM canteens ORDER BY name")
            .fetch_all(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch canteens");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    Ok(HttpResponse::Ok().json(canteens))
}

/// Get Canteen by ID
#[utoipa::path(
    get,
    path = "/api/v1/canteen/{canteen_id}",
    params(("canteen_id", Path, description = "Canteen ID")),
    responses(
        (status = 200, body = Canteen),
        (status = 404, description = "Canteen not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Canteen"
)]
pub async fn get_canteen(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let canteen_id = path.into_inner();

    let canteen = sqlx::query_as::<_, Canteen>("SELECT * FROM canteens WHERE id = ?")
        .bind(canteen_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, canteen_id, "Failed to fetch canteen");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match canteen {
        Some(c) => Ok(HttpResponse::Ok().json(c)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Canteen not found"
        }))),
    }
}

/// Update Canteen
#[utoipa::path(
    put,
    path = "/api/v1/canteen/{canteen_id}",
    params(("canteen_id", Path, description = "Canteen ID")),
    responses(
        (status = 200, description = "Canteen updated"),
        (status = 404, description = "Canteen not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Canteen"
)]
pub async fn update_canteen(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let canteen_id = path.into_inner();

    let update = build_update_sql("canteens", &body, UPDATE_COLUMNS, "id", canteen_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Canteen not found"
        })));
    }

    // Billing type may have changed; next lookup re-reads it.
    billing_cache::invalidate(canteen_id as u64).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Canteen updated successfully"
    })))
}

/// Canteen id → billing type map, served to the daily-entry flow.
#[utoipa::path(
    get,
    path = "/api/v1/canteen/billing-types",
    responses(
        (status = 200, description = "Map of canteen id to billing type")
    ),
    security(("bearer_auth" = [])),
    tag = "Canteen"
)]
pub async fn billing_types(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let rows = sqlx::query_as::<_, (u64, String)>("SELECT id, billing_type FROM canteens")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch billing types");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let mut map: HashMap<String, String> = HashMap::with_capacity(rows.len());
    for (id, billing_type) in rows {
        billing_cache::store(id, &billing_type).await;
        map.insert(id.to_string(), billing_type);
    }

    Ok(HttpResponse::Ok().json(map))
}

/// Canteen summary report: lifetime income, expense total, staff count and
/// the most recent expense entries.
#[utoipa::path(
    get,
    path = "/api/v1/canteen/{canteen_id}/summary",
    params(("canteen_id", Path, description = "Canteen ID")),
    responses(
        (status = 200, body = CanteenSummary),
        (status = 404, description = "Canteen not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Canteen"
)]
pub async fn canteen_summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let canteen_id = path.into_inner();

    let canteen = sqlx::query_as::<_, Canteen>("SELECT * FROM canteens WHERE id = ?")
        .bind(canteen_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, canteen_id, "Failed to fetch canteen");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let canteen = match canteen {
        Some(c) => c,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Canteen not found"
            })));
        }
    };

    let total_expense = sqlx::query_scalar::<_, Option<Decimal>>(
        "SELECT SUM(amount) FROM expenses WHERE canteen_id = ?",
    )
    .bind(canteen_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, canteen_id, "Failed to sum expenses");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?
    .unwrap_or(Decimal::ZERO);

    let total_income = sqlx::query_scalar::<_, Option<Decimal>>(
        "SELECT SUM(cash_received + online_received) FROM daily_entries WHERE canteen_id = ?",
    )
    .bind(canteen_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, canteen_id, "Failed to sum income");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?
    .unwrap_or(Decimal::ZERO);

    let staff_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM staff WHERE canteen_id = ?")
            .bind(canteen_id)
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, canteen_id, "Failed to count staff");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    let recent_expenses = sqlx::query_as::<_, Expense>(
        "SELECT * FROM expenses WHERE canteen_id = ? ORDER BY date DESC, id DESC LIMIT 20",
    )
    .bind(canteen_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, canteen_id, "Failed to fetch recent expenses");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(CanteenSummary {
        canteen,
        total_income,
        total_expense,
        staff_count,
        recent_expenses,
    }))
}

#[derive(Serialize, ToSchema)]
pub struct CanteenDayReport {
    #[schema(example = "2026-03-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub entry: Option<crate::model::daily_entry::DailyEntry>,
    pub expenses: Vec<Expense>,
}

/// Single-date detail report: that day's service/payment entry plus expenses.
#[utoipa::path(
    get,
    path = "/api/v1/canteen/{canteen_id}/report/{date}",
    params(
        ("canteen_id", Path, description = "Canteen ID"),
        ("date", Path, description = "Report date (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, body = CanteenDayReport)
    ),
    security(("bearer_auth" = [])),
    tag = "Canteen"
)]
pub async fn canteen_day_report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<(u64, NaiveDate)>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let (canteen_id, date) = path.into_inner();

    let entry = sqlx::query_as::<_, crate::model::daily_entry::DailyEntry>(
        "SELECT * FROM daily_entries WHERE canteen_id = ? AND date = ?",
    )
    .bind(canteen_id)
    .bind(date)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, canteen_id, "Failed to fetch daily entry");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let expenses = sqlx::query_as::<_, Expense>(
        "SELECT * FROM expenses WHERE canteen_id = ? AND date = ? ORDER BY id",
    )
    .bind(canteen_id)
    .bind(date)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, canteen_id, "Failed to fetch expenses for date");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(CanteenDayReport {
        date,
        entry,
        expenses,
    }))
}
