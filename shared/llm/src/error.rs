use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Missing API key: {0} is not set")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("LLM returned no content")]
    EmptyResponse,

    #[error("Could not parse LLM output: {0}")]
    Parse(String),
}

pub type LlmResult<T> = Result<T, LlmError>;
