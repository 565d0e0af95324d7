use actix_web::web;

use crate::handlers::leaves;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leaves")
            .route("/statistics", web::get().to(leaves::statistics))
            .route(
                "/balance/{employee_id}",
                web::get().to(leaves::get_balance),
            )
            .route("", web::post().to(leaves::create_request))
            .route("", web::get().to(leaves::get_requests))
            .route("/{id}", web::get().to(leaves::get_request))
            .route("/{id}", web::patch().to(leaves::update_request))
            .route("/{id}", web::delete().to(leaves::delete_request))
            .route("/{id}/status", web::patch().to(leaves::update_status)),
    );
}
