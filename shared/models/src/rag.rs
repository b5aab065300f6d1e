use serde::{Deserialize, Serialize};

/// A question together with the synthesized answer.
///
/// The answer oracle only produces text; the question is attached by the
/// orchestrator that asked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
}

impl Answer {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Candidate Cypher statement produced by a query translator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CypherQuery {
    pub query: String,
}

impl CypherQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.query
    }

    /// A query with no executable text (empty or whitespace only)
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}

/// A document chunk returned by nearest-neighbour retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The document text that was uncovered by the query
    pub document: String,
    /// Distance from the query to this chunk (lower is closer)
    pub distance: f32,
}

impl Chunk {
    pub fn new(document: impl Into<String>, distance: f32) -> Self {
        Self {
            document: document.into(),
            distance,
        }
    }
}
