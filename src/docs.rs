use crate::api::canteen::{CanteenDayReport, CanteenSummary, CreateCanteen};
use crate::api::daily_entry::{CreateDailyEntry, DailyEntryListResponse, DailyEntryQuery};
use crate::api::dashboard::DashboardResponse;
use crate::api::expense::{CreateExpense, ExpenseListResponse, ExpenseQuery};
use crate::api::export::MonthQuery;
use crate::api::leave::{ApplyLeave, LeaveFilter, LeaveListResponse, LeaveRow};
use crate::api::payment::{CreatePayment, PaymentListResponse, PaymentQuery};
use crate::api::payroll::{
    GeneratePayroll, PaginatedPayslipResponse, PayrollSummaryResponse, PayrollSummaryRow,
    PayslipQuery,
};
use crate::api::staff::{CreateStaff, LedgerResponse, MarkLeft, StaffListResponse};
use crate::ledger::{LedgerEntry, PayrollLine};
use crate::model::canteen::{BillingType, Canteen};
use crate::model::daily_entry::DailyEntry;
use crate::model::expense::{Expense, ExpenseCategory, PaymentMode};
use crate::model::leave::StaffLeave;
use crate::model::payment::{PaymentType, SalaryPayment};
use crate::model::payslip::Payslip;
use crate::model::staff::{Staff, StaffRole};
use crate::models::{LoginReq, RegisterReq};
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Canteen Manager API",
        version = "1.0.0",
        description = r#"
## Canteen Operations Management

This API powers an administrative system for tracking canteen operations
across sites.

### 🔹 Key Features
- **Canteen Registry**
  - Daily-billed and monthly-billed canteens, per-date service entries
- **Staff Management**
  - Staff profiles, joining/leaving lifecycle, per-staff ledgers
- **Leave & Payments**
  - Paid/unpaid leave periods, salary/advance/bonus payments
- **Expenses & Income**
  - Categorized expense tracking, daily cash/online income entries
- **Payroll**
  - Month snapshots, payslip generation, CSV exports

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Mutating and reporting operations require the **Admin** or **Manager** role.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::dashboard::home_dashboard,

        crate::api::canteen::create_canteen,
        crate::api::canteen::list_canteens,
        crate::api::canteen::get_canteen,
        crate::api::canteen::update_canteen,
        crate::api::canteen::billing_types,
        crate::api::canteen::canteen_summary,
        crate::api::canteen::canteen_day_report,

        crate::api::staff::create_staff,
        crate::api::staff::list_staff,
        crate::api::staff::ex_staff_list,
        crate::api::staff::get_staff,
        crate::api::staff::update_staff,
        crate::api::staff::mark_staff_left,
        crate::api::staff::staff_ledger,

        crate::api::leave::apply_leave,
        crate::api::leave::leave_history,

        crate::api::payment::create_payment,
        crate::api::payment::list_payments,

        crate::api::expense::create_expense,
        crate::api::expense::list_expenses,

        crate::api::daily_entry::create_daily_entry,
        crate::api::daily_entry::list_daily_entries,

        crate::api::payroll::payroll_summary,
        crate::api::payroll::generate_payroll,
        crate::api::payroll::list_payslips,
        crate::api::payroll::get_payslip,

        crate::api::export::export_monthly_expenses,
        crate::api::export::export_staff_ledger
    ),
    components(
        schemas(
            RegisterReq,
            LoginReq,
            Canteen,
            BillingType,
            CreateCanteen,
            CanteenSummary,
            CanteenDayReport,
            Staff,
            StaffRole,
            CreateStaff,
            StaffListResponse,
            MarkLeft,
            LedgerEntry,
            LedgerResponse,
            StaffLeave,
            ApplyLeave,
            LeaveFilter,
            LeaveRow,
            LeaveListResponse,
            SalaryPayment,
            PaymentType,
            CreatePayment,
            PaymentQuery,
            PaymentListResponse,
            Expense,
            ExpenseCategory,
            PaymentMode,
            CreateExpense,
            ExpenseQuery,
            ExpenseListResponse,
            DailyEntry,
            CreateDailyEntry,
            DailyEntryQuery,
            DailyEntryListResponse,
            Payslip,
            PayrollLine,
            GeneratePayroll,
            PayslipQuery,
            PaginatedPayslipResponse,
            PayrollSummaryRow,
            PayrollSummaryResponse,
            MonthQuery,
            DashboardResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication APIs"),
        (name = "Dashboard", description = "Operational summary APIs"),
        (name = "Canteen", description = "Canteen registry and report APIs"),
        (name = "Staff", description = "Staff management and ledger APIs"),
        (name = "Leave", description = "Leave period APIs"),
        (name = "Payment", description = "Salary payment APIs"),
        (name = "Expense", description = "Expense tracking APIs"),
        (name = "DailyEntry", description = "Daily service/income entry APIs"),
        (name = "Payroll", description = "Payroll summary and payslip APIs"),
        (name = "Export", description = "CSV export APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
