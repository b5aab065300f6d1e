//! Graph RAG engine.
//!
//! Answers natural-language questions by translating them into Cypher
//! against the live graph schema, running the query and handing the
//! de-duplicated results to an answer synthesizer.

pub mod errors;
pub mod graph_db;
pub mod handlers;
pub mod models;
pub mod services;

pub use errors::{GraphRagError, GraphResult};
pub use graph_db::{GraphStore, Neo4jStore, RowCursor};
pub use services::GraphRagOrchestrator;
