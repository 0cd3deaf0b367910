use crate::{auth::auth::AuthUser, model::daily_entry::DailyEntry, utils::billing_cache};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateDailyEntry {
    #[schema(example = 1)]
    pub canteen_id: u64,
    #[schema(example = "2026-03-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = 40)]
    pub lunch_qty: Option<i32>,
    #[schema(example = 35)]
    pub dinner_qty: Option<i32>,
    #[schema(example = 10)]
    pub nasta_qty: Option<i32>,
    #[schema(example = 20)]
    pub tea_qty: Option<i32>,
    #[schema(example = 30)]
    pub normal_token_qty: Option<i32>,
    #[schema(example = 5)]
    pub special_token_qty: Option<i32>,
    #[schema(example = 2)]
    pub guest_token_qty: Option<i32>,
    #[schema(example = "1200.00", value_type = String, nullable = true)]
    pub cash_received: Option<Decimal>,
    #[schema(example = "800.00", value_type = String, nullable = true)]
    pub online_received: Option<Decimal>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct DailyEntryQuery {
    #[schema(example = 1)]
    /// Filter by canteen ID
    pub canteen_id: Option<u64>,
    #[schema(example = "2026-03-01", format = "date", value_type = String)]
    /// Entries on or after this date
    pub from: Option<NaiveDate>,
    #[schema(example = "2026-03-31", format = "date", value_type = String)]
    /// Entries on or before this date
    pub to: Option<NaiveDate>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 31)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct DailyEntryListResponse {
    pub data: Vec<DailyEntry>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 31)]
    pub per_page: u32,
    #[schema(example = 31)]
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Date(NaiveDate),
}

/// Record a daily service/payment entry
///
/// One entry per canteen per date; the storage layer enforces uniqueness.
/// For MONTHLY-billed canteens the payment fields are expected to stay
/// empty, so they are rejected up front.
#[utoipa::path(
    post,
    path = "/api/v1/daily-entry",
    request_body = CreateDailyEntry,
    responses(
        (status = 201, description = "Entry recorded"),
        (status = 400, description = "Duplicate entry for this canteen and date, or unknown canteen")
    ),
    security(("bearer_auth" = [])),
    tag = "DailyEntry"
)]
pub async fn create_daily_entry(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateDailyEntry>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let billing_type = match billing_cache::billing_type(pool.get_ref(), payload.canteen_id).await {
        Some(bt) => bt,
        None => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Unknown canteen"
            })));
        }
    };

    let cash = payload.cash_received.unwrap_or(Decimal::ZERO);
    let online = payload.online_received.unwrap_or(Decimal::ZERO);

    if billing_type == "MONTHLY" && (cash > Decimal::ZERO || online > Decimal::ZERO) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Payment fields are not accepted for monthly-billed canteens"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO daily_entries
            (canteen_id, date, lunch_qty, dinner_qty, nasta_qty, tea_qty,
             normal_token_qty, special_token_qty, guest_token_qty,
             cash_received, online_received)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.canteen_id)
    .bind(payload.date)
    .bind(payload.lunch_qty.unwrap_or(0))
    .bind(payload.dinner_qty.unwrap_or(0))
    .bind(payload.nasta_qty.unwrap_or(0))
    .bind(payload.tea_qty.unwrap_or(0))
    .bind(payload.normal_token_qty.unwrap_or(0))
    .bind(payload.special_token_qty.unwrap_or(0))
    .bind(payload.guest_token_qty.unwrap_or(0))
    .bind(cash)
    .bind(online)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Daily entry recorded successfully"
        }))),

        Err(e) => {
            // Duplicate entry for the same canteen and date
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "An entry for this canteen and date already exists"
                    })));
                }
            }

            error!(error = %e, canteen_id = payload.canteen_id, "Failed to record daily entry");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Daily entry listing
#[utoipa::path(
    get,
    path = "/api/v1/daily-entry",
    params(DailyEntryQuery),
    responses(
        (status = 200, description = "Paginated daily entries", body = DailyEntryListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "DailyEntry"
)]
pub async fn list_daily_entries(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<DailyEntryQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(31).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(canteen_id) = query.canteen_id {
        where_sql.push_str(" AND canteen_id = ?");
        args.push(FilterValue::U64(canteen_id));
    }

    if let Some(from) = query.from {
        where_sql.push_str(" AND date >= ?");
        args.push(FilterValue::Date(from));
    }

    if let Some(to) = query.to {
        where_sql.push_str(" AND date <= ?");
        args.push(FilterValue::Date(to));
    }

    let count_sql = format!("SELECT COUNT(*) FROM daily_entries{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count daily entries");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        "SELECT * FROM daily_entries{} ORDER BY date DESC LIMIT ? OFFSET ?",
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, DailyEntry>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let entries = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch daily entries");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(DailyEntryListResponse {
        data: entries,
        page,
        per_page,
        total,
    }))
}
