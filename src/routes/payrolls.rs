use actix_web::web;

use crate::handlers::payrolls;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payrolls")
            .route("/my", web::get().to(payrolls::get_my_records))
            .route("/statistics", web::get().to(payrolls::statistics))
            .route("/generate", web::post().to(payrolls::generate))
            .route("", web::post().to(payrolls::create_record))
            .route("", web::get().to(payrolls::get_records))
            .route("/{id}", web::get().to(payrolls::get_record))
            .route("/{id}", web::patch().to(payrolls::update_record))
            .route("/{id}", web::delete().to(payrolls::delete_record))
            .route("/{id}/status", web::patch().to(payrolls::update_status)),
    );
}
