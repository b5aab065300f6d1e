//! Data types shared by the graph and semantic RAG services.

pub mod rag;

pub use rag::*;
