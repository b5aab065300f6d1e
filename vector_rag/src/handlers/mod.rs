pub mod ask;
pub mod disabled;
pub mod health;

pub use ask::semantic_ask;
pub use disabled::disabled_handler;
pub use health::health_handler;

use actix_web::web;

/// Routes when the semantic path is ready
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/rag/semantic/ask", web::post().to(semantic_ask))
        .route("/health", web::get().to(health_handler));
}

/// Routes when the semantic path is switched off or the index is missing
pub fn configure_disabled(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/rag/semantic/ask", web::post().to(disabled_handler))
        .route("/health", web::get().to(health_handler));
}
