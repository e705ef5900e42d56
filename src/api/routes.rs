// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index_page))
        .route("/", web::post().to(handlers::submit))
        .route("/download/pdf", web::get().to(handlers::download_pdf))
        .route("/static/{path:.*}", web::get().to(handlers::static_asset))
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(handlers::health_check))
                .route("/generate", web::post().to(handlers::generate)),
        );
}
