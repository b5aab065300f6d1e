use medgraph_config::LlmSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{LlmError, LlmResult};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// A single-turn chat completion request
#[derive(Debug, Clone)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub system_prompt: Option<&'a str>,
    pub user_prompt: &'a str,
    pub temperature: f32,
}

/// Client for OpenAI-compatible `/chat/completions` endpoints
pub struct ChatClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    referer: Option<String>,
    title: Option<String>,
}

impl ChatClient {
    pub fn new(settings: &LlmSettings) -> LlmResult<Self> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| LlmError::MissingApiKey("OPENROUTER_API_KEY".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            referer: settings.app_referer.clone(),
            title: settings.app_title.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and return the text of the first choice
    pub async fn complete(&self, request: ChatRequest<'_>) -> LlmResult<String> {
        let mut messages = Vec::new();

        if let Some(system) = request.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: Some(system.to_string()),
            });
        }

        messages.push(ChatMessage {
            role: "user".to_string(),
            content: Some(request.user_prompt.to_string()),
        });

        let body = ChatCompletionRequest {
            model: request.model,
            messages,
            temperature: request.temperature,
            max_tokens: Some(4000),
        };

        let mut http_request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");

        if let Some(referer) = &self.referer {
            http_request = http_request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            http_request = http_request.header("X-Title", title);
        }

        tracing::debug!(model = request.model, "Sending chat completion request");

        let response = http_request.json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: String) -> LlmSettings {
        LlmSettings {
            base_url,
            api_key: Some("test-key".to_string()),
            translation_model: "translate-model".to_string(),
            translation_temperature: 0.0,
            synthesis_model: "answer-model".to_string(),
            synthesis_temperature: 0.3,
            timeout_secs: 5,
            app_referer: Some("https://example.org".to_string()),
            app_title: Some("MedGraph".to_string()),
        }
    }

    fn request<'a>(prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: "translate-model",
            system_prompt: Some("system"),
            user_prompt: prompt,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(header("X-Title", "MedGraph"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "first" } },
                    { "message": { "role": "assistant", "content": "second" } }
                ]
            })))
            .mount(&server)
            .await;

        let client = ChatClient::new(&settings(server.uri())).unwrap();
        let text = client.complete(request("hello")).await.unwrap();

        assert_eq!(text, "first");
    }

    #[tokio::test]
    async fn test_api_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = ChatClient::new(&settings(server.uri())).unwrap();
        let err = client.complete(request("hello")).await.unwrap_err();

        match err {
            LlmError::Api { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = ChatClient::new(&settings(server.uri())).unwrap();
        let err = client.complete(request("hello")).await.unwrap_err();

        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[test]
    fn test_missing_api_key() {
        let mut settings = settings("http://localhost".to_string());
        settings.api_key = None;

        assert!(matches!(ChatClient::new(&settings), Err(LlmError::MissingApiKey(_))));
    }
}
