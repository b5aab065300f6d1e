use async_trait::async_trait;
use medgraph_config::LlmSettings;
use medgraph_models::CypherQuery;
use std::sync::Arc;

use crate::client::{ChatClient, ChatRequest};
use crate::error::{LlmError, LlmResult};
use crate::oracle::QueryTranslator;
use crate::prompts::{extract_json_object, strip_code_fence, text2cypher_prompt, TEXT2CYPHER_SYSTEM_PROMPT};

const CYPHER_KEYWORDS: [&str; 6] = ["MATCH", "OPTIONAL MATCH", "CALL", "WITH", "UNWIND", "RETURN"];

/// Text2cypher through a chat-completion model
pub struct LlmCypherTranslator {
    client: Arc<ChatClient>,
    model: String,
    temperature: f32,
}

impl LlmCypherTranslator {
    pub fn new(client: Arc<ChatClient>, settings: &LlmSettings) -> Self {
        Self {
            client,
            model: settings.translation_model.clone(),
            temperature: settings.translation_temperature,
        }
    }
}

#[async_trait]
impl QueryTranslator for LlmCypherTranslator {
    async fn translate(&self, schema: &str, question: &str) -> LlmResult<Option<CypherQuery>> {
        let prompt = text2cypher_prompt(schema, question);
        let raw = self
            .client
            .complete(ChatRequest {
                model: &self.model,
                system_prompt: Some(TEXT2CYPHER_SYSTEM_PROMPT),
                user_prompt: &prompt,
                temperature: self.temperature,
            })
            .await?;

        parse_query_output(&raw)
    }
}

/// Interpret the model output for the text2cypher prompt.
///
/// Accepts the requested `{"query": ...}` object, or a bare Cypher statement
/// as a fallback. An object whose query is missing, null or blank is `None`.
pub fn parse_query_output(raw: &str) -> LlmResult<Option<CypherQuery>> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Ok(None);
    }

    let query = if looks_like_cypher(body) {
        body.to_string()
    } else if let Some(object) = extract_json_object(body) {
        match object.get("query").and_then(|q| q.as_str()) {
            Some(query) => strip_code_fence(query).to_string(),
            None => {
                tracing::debug!("Translator returned an object without a query");
                return Ok(None);
            }
        }
    } else {
        let preview: String = body.chars().take(120).collect();
        return Err(LlmError::Parse(format!("expected a query object, got: {preview}")));
    };

    let query = CypherQuery::new(query);
    if query.is_blank() {
        tracing::debug!("Translator produced a blank query");
        return Ok(None);
    }
    Ok(Some(query))
}

fn looks_like_cypher(text: &str) -> bool {
    let upper = text.trim_start().to_uppercase();
    CYPHER_KEYWORDS.iter().any(|kw| upper.starts_with(kw))
}
