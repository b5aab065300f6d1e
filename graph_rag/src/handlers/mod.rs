pub mod graph_handler;

pub use graph_handler::{ask, batch, health, schema};

use actix_web::web;

/// Routes of the graph RAG service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/rag/graph")
            .route("/ask", web::post().to(ask))
            .route("/batch", web::post().to(batch))
            .route("/schema", web::get().to(schema)),
    )
    .route("/health", web::get().to(health));
}
