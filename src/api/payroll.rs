use crate::{
    auth::auth::AuthUser,
    ledger::{compute_month_payroll, month_first, month_last},
    model::leave::StaffLeave,
    model::payslip::Payslip,
    model::staff::Staff,
};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use std::collections::HashMap;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct GeneratePayroll {
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
}

#[derive(Serialize, ToSchema)]
pub struct PayrollSummaryRow {
    #[schema(example = 1)]
    pub staff_id: u64,
    #[schema(example = "Ramesh Kumar")]
    pub name: String,
    #[schema(example = 1, nullable = true)]
    pub canteen_id: Option<u64>,
    #[schema(example = "9000.00", value_type = String)]
    pub monthly_salary: Decimal,
    /// Lifetime advances handed out (to be recovered).
    #[schema(example = "4000.00", value_type = String)]
    pub total_advance_paid: Decimal,
    /// All payments inside the current month.
    #[schema(example = "9000.00", value_type = String)]
    pub paid_this_month: Decimal,
    /// Leave days fully inside the current month (paid and unpaid).
    #[schema(example = 2)]
    pub leaves_this_month: i64,
}

#[derive(Serialize, ToSchema)]
pub struct PayrollSummaryResponse {
    #[schema(example = "March 2026")]
    pub current_month: String,
    pub rows: Vec<PayrollSummaryRow>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayslipQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    #[schema(example = 1)]
    pub staff_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayslipResponse {
    pub data: Vec<Payslip>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Month snapshot across all active staff: outstanding advances, payments
/// inside the current month and leave days taken.
#[utoipa::path(
    get,
    path = "/api/v1/payroll/summary",
    responses(
        (status = 200, body = PayrollSummaryResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn payroll_summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let today = Local::now().date_naive();
    let first_day = month_first(today);
    let last_day = month_last(today);

    let all_staff = sqlx::query_as::<_, Staff>(
        "SELECT * FROM staff WHERE is_active = TRUE ORDER BY canteen_id, name",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch staff for payroll summary");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let mut rows = Vec::with_capacity(all_staff.len());

    for staff in all_staff {
        let total_advance_paid = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT SUM(amount) FROM salary_payments WHERE staff_id = ? AND payment_type = 'Advance'",
        )
        .bind(staff.id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, staff_id = staff.id, "Failed to sum advances");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?
        .unwrap_or(Decimal::ZERO);

        let paid_this_month = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT SUM(amount) FROM salary_payments WHERE staff_id = ? AND date >= ? AND date <= ?",
        )
        .bind(staff.id)
        .bind(first_day)
        .bind(last_day)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, staff_id = staff.id, "Failed to sum month payments");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?
        .unwrap_or(Decimal::ZERO);

        let leaves = sqlx::query_as::<_, StaffLeave>(
            "SELECT * FROM staff_leaves WHERE staff_id = ? AND start_date >= ? AND end_date <= ?",
        )
        .bind(staff.id)
        .bind(first_day)
        .bind(last_day)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, staff_id = staff.id, "Failed to fetch month leaves");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

        let leaves_this_month = leaves.iter().map(StaffLeave::total_days).sum();

        rows.push(PayrollSummaryRow {
            staff_id: staff.id,
            name: staff.name,
            canteen_id: staff.canteen_id,
            monthly_salary: staff.monthly_salary,
            total_advance_paid,
            paid_this_month,
            leaves_this_month,
        });
    }

    Ok(HttpResponse::Ok().json(PayrollSummaryResponse {
        current_month: today.format("%B %Y").to_string(),
        rows,
    }))
}

/// Generate payslips for a month
///
/// Replaces any previously generated payslips for that month, so the
/// operation can be re-run after corrections.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/generate",
    request_body = GeneratePayroll,
    responses(
        (status = 201, description = "Payslips generated"),
        (status = 400, description = "Invalid year/month")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<GeneratePayroll>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let month_start = match NaiveDate::from_ymd_opt(payload.year, payload.month, 1) {
        Some(d) => d,
        None => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": format!("Invalid payroll month: {}-{}", payload.year, payload.month)
            })));
        }
    };
    let month_end = month_last(month_start);

    let all_staff = sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE is_active = TRUE")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch staff for payroll generation");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let month_leaves = sqlx::query_as::<_, StaffLeave>(
        "SELECT * FROM staff_leaves WHERE start_date >= ? AND end_date <= ?",
    )
    .bind(month_start)
    .bind(month_end)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch leaves for payroll generation");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let mut leaves_by_staff: HashMap<u64, Vec<StaffLeave>> = HashMap::new();
    for leave in month_leaves {
        leaves_by_staff.entry(leave.staff_id).or_default().push(leave);
    }

    let generated_on = Local::now().date_naive();

    // Regeneration replaces the month wholesale.
    let mut tx = pool.get_ref().begin().await.map_err(|e| {
        error!(error = %e, "Failed to open payroll transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    sqlx::query("DELETE FROM payslips WHERE month = ?")
        .bind(month_start)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to clear existing payslips");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let mut generated = 0usize;

    for staff in &all_staff {
        let empty = Vec::new();
        let leaves = leaves_by_staff.get(&staff.id).unwrap_or(&empty);

        let line = compute_month_payroll(staff, leaves, payload.year, payload.month)
            .map_err(actix_web::error::ErrorBadRequest)?;

        sqlx::query(
            r#"
            INSERT INTO payslips
                (staff_id, month, total_days, working_days, paid_leaves, unpaid_leaves,
                 base_salary, deduction_amount, net_salary, generated_on)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(line.staff_id)
        .bind(line.month)
        .bind(line.total_days)
        .bind(line.working_days)
        .bind(line.paid_leaves)
        .bind(line.unpaid_leaves)
        .bind(line.base_salary)
        .bind(line.deduction_amount)
        .bind(line.net_salary)
        .bind(generated_on)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, staff_id = staff.id, "Failed to insert payslip");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

        generated += 1;
    }

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit payroll transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Payslips generated successfully",
        "month": month_start.format("%B %Y").to_string(),
        "count": generated
    })))
}

/// Payslip listing
#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PayslipQuery),
    responses(
        (status = 200, body = PaginatedPayslipResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payslips(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PayslipQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::new();
    if query.staff_id.is_some() {
        where_sql.push_str(" WHERE staff_id = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM payslips{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(staff_id) = query.staff_id {
        count_q = count_q.bind(staff_id);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count payslips");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        "SELECT * FROM payslips{} ORDER BY month DESC, staff_id LIMIT ? OFFSET ?",
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, Payslip>(&data_sql);
    if let Some(staff_id) = query.staff_id {
        data_q = data_q.bind(staff_id);
    }

    let data = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch payslip list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(PaginatedPayslipResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Get payslip by ID
#[utoipa::path(
    get,
    path = "/api/v1/payroll/{payslip_id}",
    params(
        ("payslip_id", Path, description = "Payslip ID")
    ),
    responses(
        (status = 200, body = Payslip),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_payslip(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let payslip_id = path.into_inner();

    let payslip = sqlx::query_as::<_, Payslip>("SELECT * FROM payslips WHERE id = ?")
        .bind(payslip_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, payslip_id, "Failed to fetch payslip");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match payslip {
        Some(p) => Ok(HttpResponse::Ok().json(p)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Payslip not found"
        }))),
    }
}
