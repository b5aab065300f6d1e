//! Pipeline event logging for the RAG services.
//!
//! Every step of a question's run (translate, execute, synthesize, retrieve)
//! is reported as one structured event with a consistent schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a pipeline step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationResult {
    Success,
    Failure,
    Skipped,
}

impl OperationResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Skipped => "skipped",
        }
    }
}

/// Which pipeline emitted the event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    GraphRag,
    SemanticRag,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GraphRag => "graph_rag",
            Self::SemanticRag => "semantic_rag",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RagStep {
    Introspection,
    Translation,
    Execution,
    Retrieval,
    Synthesis,
}

impl RagStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Introspection => "introspection",
            Self::Translation => "translation",
            Self::Execution => "execution",
            Self::Retrieval => "retrieval",
            Self::Synthesis => "synthesis",
        }
    }
}

/// A structured pipeline event for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagEvent {
    pub timestamp: DateTime<Utc>,
    pub category: EventCategory,
    pub step: RagStep,
    pub result: OperationResult,
    pub duration_ms: Option<u64>,
    /// Error message if failed, reason if skipped
    pub detail: Option<String>,
    /// Service that emitted the event
    pub service: String,
    pub metadata: Option<serde_json::Value>,
}

impl RagEvent {
    /// Create a new event builder
    pub fn new(service: impl Into<String>, category: EventCategory, step: RagStep) -> RagEventBuilder {
        RagEventBuilder {
            service: service.into(),
            category,
            step,
            result: OperationResult::Success,
            duration_ms: None,
            detail: None,
            metadata: None,
        }
    }
}

/// Builder for constructing pipeline events
pub struct RagEventBuilder {
    service: String,
    category: EventCategory,
    step: RagStep,
    result: OperationResult,
    duration_ms: Option<u64>,
    detail: Option<String>,
    metadata: Option<serde_json::Value>,
}

impl RagEventBuilder {
    pub fn success(mut self) -> Self {
        self.result = OperationResult::Success;
        self
    }

    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.result = OperationResult::Failure;
        self.detail = Some(error.into());
        self
    }

    pub fn skipped(mut self, reason: impl Into<String>) -> Self {
        self.result = OperationResult::Skipped;
        self.detail = Some(reason.into());
        self
    }

    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Build and emit the event. Failures log at warn, skips at debug.
    pub fn emit(self) {
        let event = self.build();
        let json = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
        let (category, step, result) = (event.category.as_str(), event.step.as_str(), event.result.as_str());
        let detail = event.detail.as_deref().unwrap_or_default();

        match event.result {
            OperationResult::Success => {
                tracing::info!(target: "rag_event", category, step, result, "RagEvent: {}", json)
            }
            OperationResult::Failure => {
                tracing::warn!(target: "rag_event", category, step, result, detail, "RagEvent: {}", json)
            }
            OperationResult::Skipped => {
                tracing::debug!(target: "rag_event", category, step, result, detail, "RagEvent: {}", json)
            }
        }
    }

    /// Build the event without emitting
    pub fn build(self) -> RagEvent {
        RagEvent {
            timestamp: Utc::now(),
            category: self.category,
            step: self.step,
            result: self.result,
            duration_ms: self.duration_ms,
            detail: self.detail,
            service: self.service,
            metadata: self.metadata,
        }
    }
}

pub fn log_step_completed(
    service: &str,
    category: EventCategory,
    step: RagStep,
    duration_ms: u64,
    metadata: serde_json::Value,
) {
    RagEvent::new(service, category, step)
        .duration_ms(duration_ms)
        .metadata(metadata)
        .success()
        .emit();
}

pub fn log_step_failed(service: &str, category: EventCategory, step: RagStep, error: &str, duration_ms: u64) {
    RagEvent::new(service, category, step)
        .duration_ms(duration_ms)
        .failure(error)
        .emit();
}

pub fn log_step_skipped(service: &str, category: EventCategory, step: RagStep, reason: &str) {
    RagEvent::new(service, category, step).skipped(reason).emit();
}
