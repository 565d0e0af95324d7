use actix_web::web;

use crate::handlers::attendance;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .route("/clock-in", web::post().to(attendance::clock_in))
            .route(
                "/clock-out/{employee_id}",
                web::post().to(attendance::clock_out),
            )
            .route("/statistics", web::get().to(attendance::statistics))
            .route("", web::post().to(attendance::create_record))
            .route("", web::get().to(attendance::get_records))
            .route("/{id}", web::get().to(attendance::get_record))
            .route("/{id}", web::patch().to(attendance::update_record))
            .route("/{id}", web::delete().to(attendance::delete_record)),
    );
}
