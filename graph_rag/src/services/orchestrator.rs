use medgraph_config::RagSettings;
use medgraph_llm::{AnswerSynthesizer, QueryTranslator};
use medgraph_observability::{log_step_completed, log_step_failed, log_step_skipped, EventCategory, RagStep};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::context_formatter::render_context;
use super::query_executor;
use super::schema_introspector::describe_schema;
use super::schema_renderer::render_schema;
use crate::errors::{GraphRagError, GraphResult};
use crate::graph_db::GraphStore;
use crate::models::{OrchestratorResult, SchemaDescription};

const SERVICE_NAME: &str = "graph-rag";

/// Question answering over the graph store.
///
/// Each question goes translate -> execute -> synthesize. The schema is read
/// once when the orchestrator is built and shared read-only by every
/// question afterwards, so independent questions can be asked concurrently.
pub struct GraphRagOrchestrator {
    store: Arc<dyn GraphStore>,
    translator: Arc<dyn QueryTranslator>,
    synthesizer: Arc<dyn AnswerSynthesizer>,
    schema: SchemaDescription,
    schema_text: String,
    step_timeout: Option<Duration>,
}

impl GraphRagOrchestrator {
    /// Describe and render the store schema, failing with
    /// `SchemaUnavailable` when the store cannot enumerate its tables.
    pub async fn new(
        store: Arc<dyn GraphStore>,
        translator: Arc<dyn QueryTranslator>,
        synthesizer: Arc<dyn AnswerSynthesizer>,
        settings: &RagSettings,
    ) -> GraphResult<Self> {
        let start = Instant::now();
        let schema = match describe_schema(store.as_ref()).await {
            Ok(schema) => schema,
            Err(e) => {
                log_step_failed(
                    SERVICE_NAME,
                    EventCategory::GraphRag,
                    RagStep::Introspection,
                    &e.to_string(),
                    elapsed_ms(start),
                );
                return Err(e);
            }
        };
        let schema_text = render_schema(&schema);

        log_step_completed(
            SERVICE_NAME,
            EventCategory::GraphRag,
            RagStep::Introspection,
            elapsed_ms(start),
            serde_json::json!({
                "nodes": schema.nodes.len(),
                "edges": schema.edges.len(),
            }),
        );

        Ok(Self {
            store,
            translator,
            synthesizer,
            schema,
            schema_text,
            step_timeout: settings.step_timeout(),
        })
    }

    pub fn schema(&self) -> &SchemaDescription {
        &self.schema
    }

    /// The rendered schema given to the translator
    pub fn schema_text(&self) -> &str {
        &self.schema_text
    }

    /// Answer one question.
    ///
    /// An empty translation and a failed query are results, not errors: they
    /// come back as `N/A` entries. Translator or synthesizer failures and
    /// step timeouts are errors.
    pub async fn ask(&self, question: &str) -> GraphResult<OrchestratorResult> {
        if question.trim().is_empty() {
            return Err(GraphRagError::InvalidRequest("question is empty".to_string()));
        }

        // Translating
        let start = Instant::now();
        let translated = self
            .bounded(self.translator.translate(&self.schema_text, question))
            .await;
        let query = match translated {
            None => return Err(self.timed_out(RagStep::Translation, start)),
            Some(Err(e)) => {
                let message = e.to_string();
                self.step_failed(RagStep::Translation, &message, start);
                return Err(GraphRagError::TranslationFailure(message));
            }
            Some(Ok(query)) => query.filter(|q| !q.is_blank()),
        };

        let Some(query) = query else {
            log_step_skipped(
                SERVICE_NAME,
                EventCategory::GraphRag,
                RagStep::Translation,
                "translator produced no query",
            );
            return Ok(OrchestratorResult::translation_empty(question));
        };
        self.step_completed(RagStep::Translation, start, serde_json::json!({ "cypher": query.as_str() }));

        // Executing
        let start = Instant::now();
        let executed = self
            .bounded(query_executor::execute(self.store.as_ref(), query.as_str()))
            .await;
        let context = match executed {
            None => {
                let err = self.timed_out(RagStep::Execution, start);
                return Ok(OrchestratorResult::execution_failed(question, query.query, err.to_string()));
            }
            Some(Err(e)) => {
                let message = match e {
                    GraphRagError::QueryExecution { message } => message,
                    other => other.to_string(),
                };
                self.step_failed(RagStep::Execution, &message, start);
                return Ok(OrchestratorResult::execution_failed(question, query.query, message));
            }
            Some(Ok(context)) => context,
        };
        self.step_completed(
            RagStep::Execution,
            start,
            serde_json::json!({ "distinct_values": context.len() }),
        );

        // Synthesizing
        let start = Instant::now();
        let rendered = render_context(&context);
        let synthesized = self
            .bounded(self.synthesizer.synthesize(question, &rendered))
            .await;
        let answer = match synthesized {
            None => return Err(self.timed_out(RagStep::Synthesis, start)),
            Some(Err(e)) => {
                let message = e.to_string();
                self.step_failed(RagStep::Synthesis, &message, start);
                return Err(GraphRagError::SynthesisFailure(message));
            }
            Some(Ok(answer)) => answer,
        };
        self.step_completed(RagStep::Synthesis, start, serde_json::json!({ "answer_chars": answer.len() }));

        Ok(OrchestratorResult::answered(question, query.query, answer))
    }

    /// Answer a batch sequentially. A failure on one question does not stop
    /// the rest; each entry carries its own outcome.
    pub async fn run<S: AsRef<str>>(&self, questions: &[S]) -> Vec<GraphResult<OrchestratorResult>> {
        let mut results = Vec::with_capacity(questions.len());

        for question in questions {
            let question = question.as_ref();
            let result = self.ask(question).await;
            if let Err(e) = &result {
                tracing::warn!(question = %question, error = %e, "Question failed, continuing batch");
            }
            results.push(result);
        }

        results
    }

    async fn bounded<F: Future>(&self, fut: F) -> Option<F::Output> {
        match self.step_timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await.ok(),
            None => Some(fut.await),
        }
    }

    fn timed_out(&self, step: RagStep, start: Instant) -> GraphRagError {
        let err = GraphRagError::StepTimeout {
            step: step.as_str(),
            timeout_ms: self.step_timeout.map(|d| d.as_millis() as u64).unwrap_or_default(),
        };
        self.step_failed(step, &err.to_string(), start);
        err
    }

    fn step_completed(&self, step: RagStep, start: Instant, metadata: serde_json::Value) {
        log_step_completed(SERVICE_NAME, EventCategory::GraphRag, step, elapsed_ms(start), metadata);
    }

    fn step_failed(&self, step: RagStep, error: &str, start: Instant) {
        log_step_failed(SERVICE_NAME, EventCategory::GraphRag, step, error, elapsed_ms(start));
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
