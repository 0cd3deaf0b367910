use crate::{auth::auth::AuthUser, ledger::LeaveInterval, model::leave::StaffLeave};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct ApplyLeave {
    #[schema(example = 1)]
    pub staff_id: u64,
    #[schema(example = "2026-03-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-14", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family function", nullable = true)]
    pub reason: Option<String>,
    /// Paid leave does not reduce salary.
    #[schema(example = false)]
    pub is_paid_leave: Option<bool>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    #[schema(example = 1)]
    /// Filter by staff ID
    pub staff_id: Option<u64>,
    #[schema(example = false)]
    /// Filter by paid/unpaid flag
    pub is_paid_leave: Option<bool>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRow>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/// A leave row plus its derived day count.
#[derive(Serialize, ToSchema)]
pub struct LeaveRow {
    #[serde(flatten)]
    pub leave: StaffLeave,
    #[schema(example = 5)]
    pub total_days: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Bool(bool),
}

/// Record a leave period
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body = ApplyLeave,
    responses(
        (status = 201, description = "Leave period recorded"),
        (status = 400, description = "Invalid interval or unknown staff member")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn apply_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ApplyLeave>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    // Reject inverted intervals at the entry boundary.
    let interval = match LeaveInterval::new(payload.start_date, payload.end_date) {
        Ok(i) => i,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": e.to_string()
            })));
        }
    };

    let result = sqlx::query(
        r#"
        INSERT INTO staff_leaves
            (staff_id, start_date, end_date, reason, is_paid_leave)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.staff_id)
    .bind(interval.start())
    .bind(interval.end())
    .bind(&payload.reason)
    .bind(payload.is_paid_leave.unwrap_or(false))
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Leave period recorded",
            "total_days": interval.total_days()
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                // FK violation: unknown staff member
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Unknown staff member"
                    })));
                }
            }

            error!(error = %e, staff_id = payload.staff_id, "Failed to record leave");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Leave history
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave history", body = LeaveListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(staff_id) = query.staff_id {
        where_sql.push_str(" AND staff_id = ?");
        args.push(FilterValue::U64(staff_id));
    }

    if let Some(is_paid) = query.is_paid_leave {
        where_sql.push_str(" AND is_paid_leave = ?");
        args.push(FilterValue::Bool(is_paid));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM staff_leaves{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Bool(v) => count_q.bind(*v),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count leave rows");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, staff_id, start_date, end_date, reason, is_paid_leave
        FROM staff_leaves
        {}
        ORDER BY start_date DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, StaffLeave>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Bool(v) => data_q.bind(v),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch leave history");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let data = leaves
        .into_iter()
        .map(|leave| {
            let total_days = leave.total_days();
            LeaveRow { leave, total_days }
        })
        .collect();

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
