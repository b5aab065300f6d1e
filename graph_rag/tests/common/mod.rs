#![allow(dead_code)]

use async_trait::async_trait;
use graph_rag::errors::{GraphRagError, GraphResult};
use graph_rag::models::{EdgeEndpoints, PropertySchema, Row, Value};
use graph_rag::{GraphStore, RowCursor};
use medgraph_config::RagSettings;
use medgraph_llm::{AnswerSynthesizer, LlmError, LlmResult, QueryTranslator};
use medgraph_models::{Chunk, CypherQuery};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const MORPHINE_QUESTION: &str = "What are the side effects of Morphine?";
pub const MORPHINE_QUERY: &str =
    "MATCH (d:DrugGeneric)-[:CAN_CAUSE]->(s:Symptom) WHERE LOWER(d.name)='morphine' RETURN s.name";

pub fn settings() -> RagSettings {
    RagSettings {
        step_timeout_secs: None,
        semantic_depth: 2,
    }
}

pub fn strings(values: &[&str]) -> Row {
    values.iter().map(|v| Value::from(*v)).collect()
}

/// In-memory graph store with canned catalog and rows
#[derive(Default)]
pub struct FakeStore {
    pub node_labels: Vec<String>,
    pub edges: Vec<EdgeEndpoints>,
    pub tables: HashMap<String, Vec<PropertySchema>>,
    pub rows: Vec<Row>,
    /// Rejects every query with this message
    pub query_error: Option<String>,
    /// Fails the cursor after this many rows
    pub fail_after_rows: Option<usize>,
    pub catalog_error: Option<String>,
    pub query_delay: Option<Duration>,
    pub executed: Mutex<Vec<String>>,
}

impl FakeStore {
    /// DrugGeneric -[:CAN_CAUSE]-> Symptom, both keyed by name
    pub fn drug_symptoms() -> Self {
        let mut tables = HashMap::new();
        tables.insert("DrugGeneric".to_string(), vec![PropertySchema::new("name", "STRING")]);
        tables.insert("Symptom".to_string(), vec![PropertySchema::new("name", "STRING")]);

        Self {
            node_labels: vec!["DrugGeneric".to_string(), "Symptom".to_string()],
            edges: vec![EdgeEndpoints::new("CAN_CAUSE", "DrugGeneric", "Symptom")],
            tables,
            ..Default::default()
        }
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub fn execute_calls(&self) -> usize {
        self.executed.lock().unwrap().len()
    }
}

#[async_trait]
impl GraphStore for FakeStore {
    async fn list_node_labels(&self) -> GraphResult<Vec<String>> {
        if let Some(message) = &self.catalog_error {
            return Err(GraphRagError::Neo4j(message.clone()));
        }
        Ok(self.node_labels.clone())
    }

    async fn list_edge_labels(&self) -> GraphResult<Vec<EdgeEndpoints>> {
        Ok(self.edges.clone())
    }

    async fn describe_table(&self, label: &str) -> GraphResult<Vec<PropertySchema>> {
        Ok(self.tables.get(label).cloned().unwrap_or_default())
    }

    async fn execute_query(&self, query: &str) -> GraphResult<Box<dyn RowCursor>> {
        self.executed.lock().unwrap().push(query.to_string());

        if let Some(delay) = self.query_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.query_error {
            return Err(GraphRagError::query_execution(message.clone()));
        }

        Ok(Box::new(FakeCursor {
            rows: self.rows.clone().into_iter(),
            served: 0,
            fail_after: self.fail_after_rows,
        }))
    }
}

struct FakeCursor {
    rows: std::vec::IntoIter<Row>,
    served: usize,
    fail_after: Option<usize>,
}

#[async_trait]
impl RowCursor for FakeCursor {
    async fn next_row(&mut self) -> GraphResult<Option<Row>> {
        if self.fail_after == Some(self.served) {
            return Err(GraphRagError::Neo4j("connection reset".to_string()));
        }
        self.served += 1;
        Ok(self.rows.next())
    }
}

/// Translator returning the same canned output for every question
pub struct FakeTranslator {
    pub output: Option<String>,
    pub fail: bool,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub schemas: Mutex<Vec<String>>,
}

impl FakeTranslator {
    pub fn returning(query: &str) -> Self {
        Self {
            output: Some(query.to_string()),
            fail: false,
            delay: None,
            calls: AtomicUsize::new(0),
            schemas: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self {
            output: None,
            ..Self::returning("")
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning("")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryTranslator for FakeTranslator {
    async fn translate(&self, schema: &str, _question: &str) -> LlmResult<Option<CypherQuery>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.schemas.lock().unwrap().push(schema.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(LlmError::Api {
                status: 503,
                body: "upstream unavailable".to_string(),
            });
        }
        Ok(self.output.clone().map(CypherQuery::new))
    }
}

/// Synthesizer that records what it was given
pub struct FakeSynthesizer {
    pub answer: String,
    /// Questions containing this text fail
    pub fail_on: Option<String>,
    pub contexts: Mutex<Vec<String>>,
    pub chunks: Mutex<Vec<Vec<Chunk>>>,
}

impl FakeSynthesizer {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            fail_on: None,
            contexts: Mutex::new(Vec::new()),
            chunks: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(answer: &str, question_part: &str) -> Self {
        Self {
            fail_on: Some(question_part.to_string()),
            ..Self::answering(answer)
        }
    }

    pub fn calls(&self) -> usize {
        self.contexts.lock().unwrap().len() + self.chunks.lock().unwrap().len()
    }

    pub fn contexts(&self) -> Vec<String> {
        self.contexts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, question: &str, context: &str) -> LlmResult<String> {
        self.contexts.lock().unwrap().push(context.to_string());
        if self.fail_on.as_deref().is_some_and(|part| question.contains(part)) {
            return Err(LlmError::EmptyResponse);
        }
        Ok(self.answer.clone())
    }

    async fn synthesize_from_chunks(&self, _question: &str, chunks: &[Chunk]) -> LlmResult<String> {
        self.chunks.lock().unwrap().push(chunks.to_vec());
        Ok(self.answer.clone())
    }
}
