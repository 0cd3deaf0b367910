use crate::{
    api::staff::{fetch_staff, load_ledger},
    auth::auth::AuthUser,
    ledger::month_last,
    model::expense::Expense,
};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct MonthQuery {
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
}

#[derive(Deserialize, ToSchema)]
pub struct LedgerExportQuery {
    #[schema(example = "2026-01-01", format = "date", value_type = String, nullable = true)]
    pub start: Option<NaiveDate>,
    #[schema(example = "2026-03-31", format = "date", value_type = String, nullable = true)]
    pub end: Option<NaiveDate>,
}

fn csv_response(filename: &str, body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(body)
}

fn csv_error(e: csv::Error) -> actix_web::Error {
    error!(error = %e, "CSV serialization failed");
    actix_web::error::ErrorInternalServerError("Internal Server Error")
}

/// Monthly expense export (CSV)
#[utoipa::path(
    get,
    path = "/api/v1/expense/export",
    params(MonthQuery),
    responses(
        (status = 200, description = "CSV attachment of the month's expenses"),
        (status = 400, description = "Invalid year/month")
    ),
    security(("bearer_auth" = [])),
    tag = "Export"
)]
pub async fn export_monthly_expenses(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let month_start = match NaiveDate::from_ymd_opt(query.year, query.month, 1) {
        Some(d) => d,
        None => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": format!("Invalid month: {}-{}", query.year, query.month)
            })));
        }
    };
    let month_end = month_last(month_start);

    let expenses = sqlx::query_as::<_, Expense>(
        "SELECT * FROM expenses WHERE date >= ? AND date <= ? ORDER BY date, id",
    )
    .bind(month_start)
    .bind(month_end)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch expenses for export");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "Date",
            "Canteen ID",
            "Category",
            "Description",
            "Quantity",
            "Amount",
            "Payment Mode",
        ])
        .map_err(csv_error)?;

    for expense in &expenses {
        writer
            .write_record([
                expense.date.to_string(),
                expense
                    .canteen_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
                expense.category.clone(),
                expense.description.clone(),
                expense
                    .quantity
                    .map(|q| q.to_string())
                    .unwrap_or_default(),
                expense.amount.to_string(),
                expense.payment_mode.clone(),
            ])
            .map_err(csv_error)?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| {
            error!(error = %e, "CSV flush failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let filename = format!("expenses_{}.csv", month_start.format("%Y_%m"));
    Ok(csv_response(&filename, body))
}

/// Staff ledger export (CSV)
///
/// Same rows as the ledger endpoint, in carried-forward balance mode.
#[utoipa::path(
    get,
    path = "/api/v1/staff/{staff_id}/ledger/export",
    params(
        ("staff_id", Path, description = "Staff ID"),
        ("start", Query, description = "Display window start (YYYY-MM-DD)"),
        ("end", Query, description = "Display window end (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "CSV attachment of the staff ledger"),
        (status = 404, description = "Staff member not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Export"
)]
pub async fn export_staff_ledger(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<LedgerExportQuery>,
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

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Date", "Description", "Credit", "Debit", "Balance"])
        .map_err(csv_error)?;

    for entry in &entries {
        writer
            .write_record([
                entry.date.to_string(),
                entry.description.clone(),
                entry.credit.to_string(),
                entry.debit.to_string(),
                entry.balance.to_string(),
            ])
            .map_err(csv_error)?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| {
            error!(error = %e, "CSV flush failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let filename = format!("ledger_staff_{}.csv", staff.id);
    Ok(csv_response(&filename, body))
}
