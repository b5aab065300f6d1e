use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::VectorResult;

pub mod openai;

pub use openai::*;

/// Turns question text into a query vector for the index
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn embed(&self, text: &str) -> VectorResult<Vec<f32>>;
}

#[derive(Debug, Deserialize)]
pub struct SemanticAskRequest {
    pub question: String,
    /// Number of nearest chunks; the configured default when absent
    pub depth: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub index_available: bool,
}

#[derive(Debug, Serialize, Clone)]
pub struct RagStatus {
    pub available: bool,
    pub reason: Option<String>,
}
