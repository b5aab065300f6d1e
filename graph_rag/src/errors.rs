use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphRagError {
    #[error("Neo4j error: {0}")]
    Neo4j(String),

    #[error("Schema unavailable: {0}")]
    SchemaUnavailable(String),

    #[error("Query execution failed: {message}")]
    QueryExecution { message: String },

    #[error("Query translation failed: {0}")]
    TranslationFailure(String),

    #[error("Answer synthesis failed: {0}")]
    SynthesisFailure(String),

    #[error("{step} step timed out after {timeout_ms}ms")]
    StepTimeout { step: &'static str, timeout_ms: u64 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Feature disabled: {0}")]
    Disabled(String),
}

impl GraphRagError {
    pub fn query_execution(message: impl Into<String>) -> Self {
        Self::QueryExecution {
            message: message.into(),
        }
    }
}

impl ResponseError for GraphRagError {
    fn status_code(&self) -> StatusCode {
        match self {
            GraphRagError::SchemaUnavailable(_) | GraphRagError::Disabled(_) => StatusCode::SERVICE_UNAVAILABLE,
            GraphRagError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GraphRagError::StepTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GraphRagError::TranslationFailure(_) | GraphRagError::SynthesisFailure(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

pub type GraphResult<T> = Result<T, GraphRagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GraphRagError::SchemaUnavailable("no tables".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            GraphRagError::InvalidRequest("empty question".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GraphRagError::StepTimeout { step: "synthesis", timeout_ms: 10 }.status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            GraphRagError::SynthesisFailure("empty".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = GraphRagError::StepTimeout { step: "translation", timeout_ms: 1500 };
        assert_eq!(err.to_string(), "translation step timed out after 1500ms");
    }
}
