use crate::{
    api::{canteen, daily_entry, dashboard, expense, export, leave, payment, payroll, staff},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(protected_limiter) // rate limiting
            .service(web::resource("/me").route(web::get().to(handlers::me)))
            .service(web::resource("/dashboard").route(web::get().to(dashboard::home_dashboard)))
            .service(
                web::scope("/canteen")
                    // /canteen
                    .service(
                        web::resource("")
                            .route(web::post().to(canteen::create_canteen))
                            .route(web::get().to(canteen::list_canteens)),
                    )
                    // literal segment before /{id}
                    .service(
                        web::resource("/billing-types")
                            .route(web::get().to(canteen::billing_types)),
                    )
                    // /canteen/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(canteen::get_canteen))
                            .route(web::put().to(canteen::update_canteen)),
                    )
                    // /canteen/{id}/summary
                    .service(
                        web::resource("/{id}/summary")
                            .route(web::get().to(canteen::canteen_summary)),
                    )
                    // /canteen/{id}/report/{date}
                    .service(
                        web::resource("/{id}/report/{date}")
                            .route(web::get().to(canteen::canteen_day_report)),
                    ),
            )
            .service(
                web::scope("/staff")
                    // /staff
                    .service(
                        web::resource("")
                            .route(web::post().to(staff::create_staff))
                            .route(web::get().to(staff::list_staff)),
                    )
                    // literal segment before /{id}
                    .service(web::resource("/ex").route(web::get().to(staff::ex_staff_list)))
                    // /staff/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(staff::get_staff))
                            .route(web::put().to(staff::update_staff)),
                    )
                    // /staff/{id}/left
                    .service(
                        web::resource("/{id}/left").route(web::put().to(staff::mark_staff_left)),
                    )
                    // /staff/{id}/ledger
                    .service(
                        web::resource("/{id}/ledger").route(web::get().to(staff::staff_ledger)),
                    )
                    // /staff/{id}/ledger/export
                    .service(
                        web::resource("/{id}/ledger/export")
                            .route(web::get().to(export::export_staff_ledger)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave::leave_history))
                            .route(web::post().to(leave::apply_leave)),
                    ),
            )
            .service(
                web::scope("/payment")
                    // /payment
                    .service(
                        web::resource("")
                            .route(web::get().to(payment::list_payments))
                            .route(web::post().to(payment::create_payment)),
                    ),
            )
            .service(
                web::scope("/expense")
                    // /expense
                    .service(
                        web::resource("")
                            .route(web::get().to(expense::list_expenses))
                            .route(web::post().to(expense::create_expense)),
                    )
                    // /expense/export
                    .service(
                        web::resource("/export")
                            .route(web::get().to(export::export_monthly_expenses)),
                    ),
            )
            .service(
                web::scope("/daily-entry")
                    // /daily-entry
                    .service(
                        web::resource("")
                            .route(web::get().to(daily_entry::list_daily_entries))
                            .route(web::post().to(daily_entry::create_daily_entry)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    // literal segments before /{id}
                    .service(
                        web::resource("/summary").route(web::get().to(payroll::payroll_summary)),
                    )
                    .service(
                        web::resource("/generate").route(web::post().to(payroll::generate_payroll)),
                    )
                    // /payroll
                    .service(web::resource("").route(web::get().to(payroll::list_payslips)))
                    // /payroll/{id}
                    .service(web::resource("/{id}").route(web::get().to(payroll::get_payslip))),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)
//
// API REQUEST
//  └─ Authorization: Bearer access_token
//
// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token
