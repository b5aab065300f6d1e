pub mod semantic_rag;
pub mod vector_store;

pub use semantic_rag::SemanticRag;
pub use vector_store::{SearchResult, VectorIndex, ZillizVectorIndex};
