pub mod rag;
pub mod schema;
pub mod value;

pub use rag::*;
pub use schema::*;
pub use value::*;
