use actix_web::web;

use crate::middleware::PermissionGuard;

pub mod attendance;
pub mod auth;
pub mod departments;
pub mod documents;
pub mod employees;
pub mod leaves;
pub mod payrolls;
pub mod reviews;
pub mod stats;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .wrap(PermissionGuard)
            .configure(auth::configure)
            .configure(departments::configure)
            .configure(employees::configure)
            .configure(attendance::configure)
            .configure(leaves::configure)
            .configure(payrolls::configure)
            .configure(documents::configure)
            .configure(reviews::configure)
            .configure(stats::configure),
    );
}
