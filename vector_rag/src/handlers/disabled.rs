use actix_web::{web, HttpResponse};

use crate::models::RagStatus;

pub async fn disabled_handler(status: web::Data<RagStatus>) -> HttpResponse {
    let reason = status.reason.clone().unwrap_or_else(|| "disabled".to_string());
    HttpResponse::ServiceUnavailable().json(serde_json::json!({
        "error": "Semantic RAG unavailable",
        "reason": reason,
        "available": false,
    }))
}
