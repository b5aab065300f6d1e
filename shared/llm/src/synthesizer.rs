use async_trait::async_trait;
use medgraph_config::LlmSettings;
use medgraph_models::Chunk;
use std::sync::Arc;

use crate::client::{ChatClient, ChatRequest};
use crate::error::{LlmError, LlmResult};
use crate::oracle::AnswerSynthesizer;
use crate::prompts::{answer_prompt, chunks_context, extract_json_field, strip_code_fence, RAG_ANSWER_SYSTEM_PROMPT};

pub struct LlmAnswerSynthesizer {
    client: Arc<ChatClient>,
    model: String,
    temperature: f32,
}

impl LlmAnswerSynthesizer {
    pub fn new(client: Arc<ChatClient>, settings: &LlmSettings) -> Self {
        Self {
            client,
            model: settings.synthesis_model.clone(),
            temperature: settings.synthesis_temperature,
        }
    }

    async fn answer(&self, question: &str, context: &str) -> LlmResult<String> {
        let prompt = answer_prompt(question, context);
        let raw = self
            .client
            .complete(ChatRequest {
                model: &self.model,
                system_prompt: Some(RAG_ANSWER_SYSTEM_PROMPT),
                user_prompt: &prompt,
                temperature: self.temperature,
            })
            .await?;

        parse_answer_output(&raw)
    }
}

#[async_trait]
impl AnswerSynthesizer for LlmAnswerSynthesizer {
    async fn synthesize(&self, question: &str, context: &str) -> LlmResult<String> {
        self.answer(question, context).await
    }

    async fn synthesize_from_chunks(&self, question: &str, chunks: &[Chunk]) -> LlmResult<String> {
        self.answer(question, &chunks_context(chunks)).await
    }
}

/// Take the `answer` field when the model followed the format, otherwise the
/// raw text.
pub fn parse_answer_output(raw: &str) -> LlmResult<String> {
    if let Some(answer) = extract_json_field(raw, "answer") {
        return Ok(answer);
    }

    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(body.to_string())
}
