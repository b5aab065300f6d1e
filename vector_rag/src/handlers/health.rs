use actix_web::{web, HttpResponse};

use crate::models::{HealthResponse, RagStatus};

pub async fn health_handler(status: web::Data<RagStatus>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        index_available: status.available,
    })
}
