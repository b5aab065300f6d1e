use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VectorRagError {
    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Vector search failed: {0}")]
    Search(String),

    #[error("Answer synthesis failed: {0}")]
    SynthesisFailure(String),

    #[error("{step} step timed out after {timeout_ms}ms")]
    StepTimeout { step: &'static str, timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ResponseError for VectorRagError {
    fn status_code(&self) -> StatusCode {
        match self {
            VectorRagError::IndexUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            VectorRagError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            VectorRagError::StepTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            VectorRagError::Embedding(_) | VectorRagError::SynthesisFailure(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

pub type VectorResult<T> = Result<T, VectorRagError>;
