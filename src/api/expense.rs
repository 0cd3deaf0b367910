use crate::{
    auth::auth::AuthUser,
    model::expense::{Expense, ExpenseCategory, PaymentMode},
};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateExpense {
    #[schema(example = 1, nullable = true)]
    pub canteen_id: Option<u64>,
    #[schema(example = "2026-03-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Vegetables")]
    pub category: ExpenseCategory,
    #[schema(example = "5kg Tomato")]
    pub description: String,
    #[schema(example = "180.00", value_type = String)]
    pub amount: Decimal,
    #[schema(example = "5.00", value_type = String, nullable = true)]
    pub quantity: Option<Decimal>,
    #[schema(example = "Cash")]
    pub payment_mode: Option<PaymentMode>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ExpenseQuery {
    #[schema(example = 1)]
    /// Filter by canteen ID
    pub canteen_id: Option<u64>,
    #[schema(example = "Vegetables")]
    /// Filter by category
    pub category: Option<String>,
    #[schema(example = "2026-03-01", format = "date", value_type = String)]
    /// Entries on or after this date
    pub from: Option<NaiveDate>,
    #[schema(example = "2026-03-31", format = "date", value_type = String)]
    /// Entries on or before this date
    pub to: Option<NaiveDate>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 20)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct ExpenseListResponse {
    pub data: Vec<Expense>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 12)]
    pub total: i64,
    /// Sum over the filtered rows, all pages.
    #[schema(example = "4380.00", value_type = String)]
    pub total_amount: Decimal,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(String),
    Date(NaiveDate),
}

/// Record an expense
#[utoipa::path(
    post,
    path = "/api/v1/expense",
    request_body = CreateExpense,
    responses(
        (status = 201, description = "Expense recorded"),
        (status = 400, description = "Invalid amount")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn create_expense(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateExpense>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    if payload.amount < Decimal::ZERO {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Amount must not be negative"
        })));
    }

    let payment_mode = payload
        .payment_mode
        .as_ref()
        .map(PaymentMode::as_str)
        .unwrap_or("Cash");

    let result = sqlx::query(
        r#"
        INSERT INTO expenses
            (canteen_id, date, category, description, amount, quantity, payment_mode)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.canteen_id)
    .bind(payload.date)
    .bind(payload.category.as_str())
    .bind(&payload.description)
    .bind(payload.amount)
    .bind(payload.quantity)
    .bind(payment_mode)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Expense recorded successfully"
        }))),
        Err(e) => {
            error!(error = %e, "Failed to record expense");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Expense listing with filters and a filtered total
#[utoipa::path(
    get,
    path = "/api/v1/expense",
    params(ExpenseQuery),
    responses(
        (status = 200, description = "Paginated expense list", body = ExpenseListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn list_expenses(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ExpenseQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(canteen_id) = query.canteen_id {
        where_sql.push_str(" AND canteen_id = ?");
        args.push(FilterValue::U64(canteen_id));
    }

    if let Some(category) = &query.category {
        where_sql.push_str(" AND category = ?");
        args.push(FilterValue::Str(category.clone()));
    }

    if let Some(from) = query.from {
        where_sql.push_str(" AND date >= ?");
        args.push(FilterValue::Date(from));
    }

    if let Some(to) = query.to {
        where_sql.push_str(" AND date <= ?");
        args.push(FilterValue::Date(to));
    }

    let count_sql = format!(
        "SELECT COUNT(*), COALESCE(SUM(amount), 0) FROM expenses{}",
        where_sql
    );

    let mut count_q = sqlx::query_as::<_, (i64, Decimal)>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(s.clone()),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let (total, total_amount) = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count expenses");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, canteen_id, date, category, description, amount, quantity, payment_mode
        FROM expenses
        {}
        ORDER BY date DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, Expense>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let expenses = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch expenses");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(ExpenseListResponse {
        data: expenses,
        page,
        per_page,
        total,
        total_amount,
    }))
}
