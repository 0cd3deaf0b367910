use crate::{
    auth::auth::AuthUser,
    ledger::{LedgerEntry, compute_ledger},
    model::leave::StaffLeave,
    model::payment::SalaryPayment,
    model::staff::{Staff, StaffRole},
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateStaff {
    #[schema(example = 1, nullable = true)]
    pub canteen_id: Option<u64>,
    #[schema(example = "Ramesh Kumar")]
    pub name: String,
    #[schema(example = "Cook")]
    pub role: StaffRole,
    #[schema(example = "9876543210")]
    pub phone: Option<String>,
    #[schema(example = "2025-04-01", format = "date", value_type = String, nullable = true)]
    pub joining_date: Option<NaiveDate>,
    #[schema(example = "9000.00", value_type = String)]
    pub monthly_salary: Decimal,
    #[schema(example = "110023456789", nullable = true)]
    pub bank_account_no: Option<String>,
    #[schema(example = "SBIN0001234", nullable = true)]
    pub ifsc_code: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StaffQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub canteen_id: Option<u64>,
    pub role: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct StaffListResponse {
    pub data: Vec<Staff>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 7)]
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct MarkLeft {
    #[schema(example = "2026-06-30", format = "date", value_type = String, nullable = true)]
    pub leaving_date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct LedgerQuery {
    /// Display window start; the opening balance is carried forward, not reset.
    #[schema(example = "2026-01-01", format = "date", value_type = String, nullable = true)]
    pub start: Option<NaiveDate>,
    #[schema(example = "2026-03-31", format = "date", value_type = String, nullable = true)]
    pub end: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct LedgerResponse {
    #[schema(example = 1)]
    pub staff_id: u64,
    #[schema(example = "Ramesh Kumar")]
    pub staff_name: String,
    pub entries: Vec<LedgerEntry>,
    /// Balance after the last returned row.
    #[schema(example = "7000.00", value_type = String)]
    pub closing_balance: Decimal,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(String),
    Bool(bool),
}

const UPDATE_COLUMNS: &[&str] = &[
    "canteen_id",
    "name",
    "role",
    "phone",
    "joining_date",
    "monthly_salary",
    "bank_account_no",
    "ifsc_code",
];

/// Create Staff
#[utoipa::path(
    post,
    path = "/api/v1/staff",
    request_body = CreateStaff,
    responses(
        (status = 201, description = "Staff member created")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn create_staff(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateStaff>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO staff
        (canteen_id, name, role, phone, joining_date, monthly_salary, bank_account_no, ifsc_code, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, TRUE)
        "#,
    )
    .bind(payload.canteen_id)
    .bind(payload.name.trim())
    .bind(payload.role.as_str())
    .bind(payload.phone.as_deref().unwrap_or("0000000000"))
    .bind(payload.joining_date)
    .bind(payload.monthly_salary)
    .bind(&payload.bank_account_no)
    .bind(&payload.ifsc_code)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Staff member created successfully"
        }))),
        Err(e) => {
            error!(error = %e, "Failed to create staff member");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// List active staff
#[utoipa::path(
    get,
    path = "/api/v1/staff",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("canteen_id", Query, description = "Filter by canteen"),
        ("role", Query, description = "Filter by role (Cook/Helper)"),
        ("search", Query, description = "Search by name or phone")
    ),
    responses(
        (status = 200, description = "Paginated staff list", body = StaffListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn list_staff(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<StaffQuery>,
) -> actix_web::Result<impl Responder> {
    staff_listing(pool.get_ref(), &query, true).await
}

/// Former staff (marked left)
#[utoipa::path(
    get,
    path = "/api/v1/staff/ex",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated ex-staff list", body = StaffListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn ex_staff_list(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<StaffQuery>,
) -> actix_web::Result<impl Responder> {
    staff_listing(pool.get_ref(), &query, false).await
}

async fn staff_listing(
    pool: &MySqlPool,
    query: &StaffQuery,
    active: bool,
) -> actix_web::Result<HttpResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = vec!["is_active = ?"];
    let mut bindings: Vec<FilterValue> = vec![FilterValue::Bool(active)];

    if let Some(canteen_id) = query.canteen_id {
        conditions.push("canteen_id = ?");
        bindings.push(FilterValue::U64(canteen_id));
    }

    if let Some(role) = &query.role {
        conditions.push("role = ?");
        bindings.push(FilterValue::Str(role.clone()));
    }

    if let Some(search) = &query.search {
        conditions.push("(name LIKE ? OR phone LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like));
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) FROM staff {}", where_clause);
    debug!(sql = %count_sql, "Counting staff");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::U64(v) => count_query.bind(*v),
            FilterValue::Str(s) => count_query.bind(s.clone()),
            FilterValue::Bool(v) => count_query.bind(*v),
        };
    }

    let total = count_query.fetch_one(pool).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count staff");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM staff {} ORDER BY name LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching staff");

    let mut data_query = sqlx::query_as::<_, Staff>(&data_sql);
    for b in &bindings {
        data_query = match b {
            FilterValue::U64(v) => data_query.bind(*v),
            FilterValue::Str(s) => data_query.bind(s.clone()),
            FilterValue::Bool(v) => data_query.bind(*v),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let staff = data_query.fetch_all(pool).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch staff");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(StaffListResponse {
        data: staff,
        page,
        per_page,
        total,
    }))
}

/// Get staff member by ID
#[utoipa::path(
    get,
    path = "/api/v1/staff/{staff_id}",
    params(("staff_id", Path, description = "Staff ID")),
    responses(
        (status = 200, body = Staff),
        (status = 404, description = "Staff member not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn get_staff(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let staff_id = path.into_inner();

    match fetch_staff(pool.get_ref(), staff_id).await? {
        Some(s) => Ok(HttpResponse::Ok().json(s)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Staff member not found"
        }))),
    }
}

/// Update staff member
#[utoipa::path(
    put,
    path = "/api/v1/staff/{staff_id}",
    params(("staff_id", Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff member updated"),
        (status = 404, description = "Staff member not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn update_staff(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let staff_id = path.into_inner();

    let update = build_update_sql("staff", &body, UPDATE_COLUMNS, "id", staff_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Staff member not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Staff member updated successfully"
    })))
}

/// Mark a staff member as left
#[utoipa::path(
    put,
    path = "/api/v1/staff/{staff_id}/left",
    params(("staff_id", Path, description = "Staff ID")),
    request_body = MarkLeft,
    responses(
        (status = 200, description = "Staff member marked as left"),
        (status = 400, description = "Already marked as left"),
        (status = 404, description = "Staff member not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn mark_staff_left(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<MarkLeft>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let staff_id = path.into_inner();
    let leaving_date = payload
        .leaving_date
        .unwrap_or_else(|| Local::now().date_naive());

    let result = sqlx::query(
        r#"
        UPDATE staff
        SET is_active = FALSE, leaving_date = ?
        WHERE id = ?
        AND is_active = TRUE
        "#,
    )
    .bind(leaving_date)
    .bind(staff_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, staff_id, "Failed to mark staff as left");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Staff member not found or already marked as left"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Staff member marked as left"
    })))
}

/// Staff ledger: salary credits, payment debits and the running balance.
#[utoipa::path(
    get,
    path = "/api/v1/staff/{staff_id}/ledger",
    params(
        ("staff_id", Path, description = "Staff ID"),
        ("start", Query, description = "Display window start (YYYY-MM-DD)"),
        ("end", Query, description = "Display window end (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, body = LedgerResponse),
        (status = 404, description = "Staff member not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn staff_ledger(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<LedgerQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let staff_id = path.into_inner();

    let staff = match fetch_staff(pool.get_ref(), staff_id).await? {
        Some(s) => s,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Staff member not found"
            })));
        }
    };

    let entries = load_ledger(pool.get_ref(), &staff, query.start, query.end).await?;
    let closing_balance = entries.last().map(|e| e.balance).unwrap_or(Decimal::ZERO);

    Ok(HttpResponse::Ok().json(LedgerResponse {
        staff_id: staff.id,
        staff_name: staff.name,
        entries,
        closing_balance,
    }))
}

pub(crate) async fn fetch_staff(
    pool: &MySqlPool,
    staff_id: u64,
) -> actix_web::Result<Option<Staff>> {
    sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE id = ?")
        .bind(staff_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!(error = %e, staff_id, "Failed to fetch staff member");
            ErrorInternalServerError("Internal Server Error")
        })
}

/// Loads leaves and payments and runs the accrual computation.
pub(crate) async fn load_ledger(
    pool: &MySqlPool,
    staff: &Staff,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> actix_web::Result<Vec<LedgerEntry>> {
    let leaves = sqlx::query_as::<_, StaffLeave>(
        "SELECT * FROM staff_leaves WHERE staff_id = ?",
    )
    .bind(staff.id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        error!(error = %e, staff_id = staff.id, "Failed to fetch leaves");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let payments = sqlx::query_as::<_, SalaryPayment>(
        "SELECT * FROM salary_payments WHERE staff_id = ?",
    )
    .bind(staff.id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        error!(error = %e, staff_id = staff.id, "Failed to fetch payments");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let today = Local::now().date_naive();
    Ok(compute_ledger(staff, &leaves, &payments, today, start, end))
}
