use async_trait::async_trait;
use medgraph_models::{Chunk, CypherQuery};

use crate::error::LlmResult;

/// Turns a natural-language question into a Cypher statement.
///
/// `Ok(None)` means the oracle answered but produced no usable query; an
/// `Err` means the oracle itself failed.
#[async_trait]
pub trait QueryTranslator: Send + Sync {
    async fn translate(&self, schema: &str, question: &str) -> LlmResult<Option<CypherQuery>>;
}

/// Writes the final answer text from retrieved context.
#[async_trait]
pub trait AnswerSynthesizer: Send + Sync {
    /// Answer from a flattened graph query context
    async fn synthesize(&self, question: &str, context: &str) -> LlmResult<String>;

    /// Answer from ranked document chunks, closest first
    async fn synthesize_from_chunks(&self, question: &str, chunks: &[Chunk]) -> LlmResult<String>;
}
