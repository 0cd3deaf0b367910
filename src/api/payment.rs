use crate::{
    auth::auth::AuthUser,
    model::payment::{PaymentType, SalaryPayment},
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
pub struct CreatePayment {
    #[schema(example = 1)]
    pub staff_id: u64,
    #[schema(example = "2026-03-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Advance")]
    pub payment_type: PaymentType,
    #[schema(example = "2000.00", value_type = String)]
    pub amount: Decimal,
    #[schema(example = "Against March salary", nullable = true)]
    pub notes: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PaymentQuery {
    #[schema(example = 1)]
    /// Filter by staff ID
    pub staff_id: Option<u64>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct PaymentListResponse {
    pub data: Vec<SalaryPayment>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 3)]
    pub total: i64,
}

/// Record a salary/advance/bonus payment
#[utoipa::path(
    post,
    path = "/api/v1/payment",
    request_body = CreatePayment,
    responses(
        (status = 201, description = "Payment recorded"),
        (status = 400, description = "Invalid amount or unknown staff member")
    ),
    security(("bearer_auth" = [])),
    tag = "Payment"
)]
pub async fn create_payment(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreatePayment>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    if payload.amount < Decimal::ZERO {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Amount must not be negative"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO salary_payments
            (staff_id, date, payment_type, amount, notes)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.staff_id)
    .bind(payload.date)
    .bind(payload.payment_type.as_str())
    .bind(payload.amount)
    .bind(&payload.notes)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Payment recorded successfully"
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Unknown staff member"
                    })));
                }
            }

            error!(error = %e, staff_id = payload.staff_id, "Failed to record payment");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Payment history
#[utoipa::path(
    get,
    path = "/api/v1/payment",
    params(PaymentQuery),
    responses(
        (status = 200, description = "Paginated payment list", body = PaymentListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payment"
)]
pub async fn list_payments(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PaymentQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    if query.staff_id.is_some() {
        where_sql.push_str(" AND staff_id = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM salary_payments{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(staff_id) = query.staff_id {
        count_q = count_q.bind(staff_id);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count payments");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, staff_id, date, payment_type, amount, notes
        FROM salary_payments
        {}
        ORDER BY date DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, SalaryPayment>(&data_sql);
    if let Some(staff_id) = query.staff_id {
        data_q = data_q.bind(staff_id);
    }

    let payments = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch payments");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(PaymentListResponse {
        data: payments,
        page,
        per_page,
        total,
    }))
}
