use medgraph_config::RagSettings;
use medgraph_llm::AnswerSynthesizer;
use medgraph_models::Answer;
use medgraph_observability::{log_step_completed, log_step_failed, EventCategory, RagStep};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::vector_store::VectorIndex;
use crate::errors::{VectorRagError, VectorResult};

const SERVICE_NAME: &str = "vector-rag";

/// Question answering from nearest-neighbour document chunks.
///
/// Retrieved chunks go to the synthesizer exactly as the index ranked them.
pub struct SemanticRag {
    index: Arc<dyn VectorIndex>,
    synthesizer: Arc<dyn AnswerSynthesizer>,
    default_depth: usize,
    step_timeout: Option<Duration>,
}

impl SemanticRag {
    /// Fails with `IndexUnavailable` when the collection does not exist
    pub async fn new(
        index: Arc<dyn VectorIndex>,
        synthesizer: Arc<dyn AnswerSynthesizer>,
        settings: &RagSettings,
    ) -> VectorResult<Self> {
        let available = index
            .is_available()
            .await
            .map_err(|e| VectorRagError::IndexUnavailable(e.to_string()))?;
        if !available {
            return Err(VectorRagError::IndexUnavailable(
                "collection is not initialized".to_string(),
            ));
        }

        Ok(Self {
            index,
            synthesizer,
            default_depth: settings.semantic_depth,
            step_timeout: settings.step_timeout(),
        })
    }

    pub fn default_depth(&self) -> usize {
        self.default_depth
    }

    /// Answer with the configured number of chunks
    pub async fn ask(&self, question: &str) -> VectorResult<Answer> {
        self.run(question, self.default_depth).await
    }

    pub async fn run(&self, question: &str, depth: usize) -> VectorResult<Answer> {
        if question.trim().is_empty() {
            return Err(VectorRagError::InvalidRequest("question is empty".to_string()));
        }
        if depth == 0 {
            return Err(VectorRagError::InvalidRequest("depth must be at least 1".to_string()));
        }

        let start = Instant::now();
        let chunks = match self.bounded(self.index.query(question, depth)).await {
            None => return Err(self.timed_out(RagStep::Retrieval, start)),
            Some(Err(e)) => {
                log_step_failed(SERVICE_NAME, EventCategory::SemanticRag, RagStep::Retrieval, &e.to_string(), elapsed_ms(start));
                return Err(e);
            }
            Some(Ok(chunks)) => chunks,
        };
        log_step_completed(
            SERVICE_NAME,
            EventCategory::SemanticRag,
            RagStep::Retrieval,
            elapsed_ms(start),
            serde_json::json!({ "depth": depth, "chunks": chunks.len() }),
        );

        let start = Instant::now();
        let answer = match self
            .bounded(self.synthesizer.synthesize_from_chunks(question, &chunks))
            .await
        {
            None => return Err(self.timed_out(RagStep::Synthesis, start)),
            Some(Err(e)) => {
                let message = e.to_string();
                log_step_failed(SERVICE_NAME, EventCategory::SemanticRag, RagStep::Synthesis, &message, elapsed_ms(start));
                return Err(VectorRagError::SynthesisFailure(message));
            }
            Some(Ok(answer)) => answer,
        };
        log_step_completed(
            SERVICE_NAME,
            EventCategory::SemanticRag,
            RagStep::Synthesis,
            elapsed_ms(start),
            serde_json::json!({ "answer_chars": answer.len() }),
        );

        Ok(Answer::new(question, answer))
    }

    async fn bounded<F: Future>(&self, fut: F) -> Option<F::Output> {
        match self.step_timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await.ok(),
            None => Some(fut.await),
        }
    }

    fn timed_out(&self, step: RagStep, start: Instant) -> VectorRagError {
        let err = VectorRagError::StepTimeout {
            step: step.as_str(),
            timeout_ms: self.step_timeout.map(|d| d.as_millis() as u64).unwrap_or_default(),
        };
        log_step_failed(SERVICE_NAME, EventCategory::SemanticRag, step, &err.to_string(), elapsed_ms(start));
        err
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
