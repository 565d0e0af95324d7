use actix_web::web;

use crate::handlers::documents;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/documents")
            .route("/statistics", web::get().to(documents::statistics))
            .route("", web::post().to(documents::upload))
            .route("", web::get().to(documents::get_documents))
            .route("/{id}/download", web::get().to(documents::download))
            .route("/{id}", web::get().to(documents::get_document))
            .route("/{id}", web::delete().to(documents::delete_document)),
    );
}
