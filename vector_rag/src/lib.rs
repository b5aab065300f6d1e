//! Semantic RAG: answers questions from the chunks nearest to them in a
//! vector index.

pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

pub use errors::{VectorRagError, VectorResult};
pub use services::{SemanticRag, VectorIndex, ZillizVectorIndex};
