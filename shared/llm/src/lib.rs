//! LLM-backed oracles for the RAG pipelines.
//!
//! The orchestrators only see the [`QueryTranslator`] and
//! [`AnswerSynthesizer`] traits; this crate also ships implementations that
//! talk to any OpenAI-compatible chat-completions endpoint (OpenRouter by
//! default).

pub mod client;
pub mod error;
pub mod oracle;
pub mod prompts;
pub mod synthesizer;
pub mod translator;

pub use client::{ChatClient, ChatRequest};
pub use error::{LlmError, LlmResult};
pub use oracle::{AnswerSynthesizer, QueryTranslator};
pub use synthesizer::LlmAnswerSynthesizer;
pub use translator::LlmCypherTranslator;
