use actix_web::web;

use crate::handlers::reviews;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("/statistics", web::get().to(reviews::statistics))
            .route("", web::post().to(reviews::create_review))
            .route("", web::get().to(reviews::get_reviews))
            .route("/{id}", web::get().to(reviews::get_review))
            .route("/{id}", web::patch().to(reviews::update_review))
            .route("/{id}", web::delete().to(reviews::delete_review)),
    );
}
