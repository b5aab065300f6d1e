//! MedGraph observability library
//!
//! Provides the logging and tracing setup shared by the RAG services.
//!
//! # Features
//! - Pretty or JSON structured logging with a consistent schema
//! - HTTP middleware for request/response logging with request ids
//! - Structured events for each RAG pipeline step

pub mod init;
pub mod middleware;
pub mod rag_events;

pub use init::*;
pub use middleware::*;
pub use rag_events::*;

// Re-export tracing for convenience
pub use tracing::{debug, error, info, warn, trace, span, Level, Instrument};
pub use tracing::instrument;
