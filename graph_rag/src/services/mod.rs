pub mod context_formatter;
pub mod orchestrator;
pub mod query_executor;
pub mod schema_introspector;
pub mod schema_renderer;

pub use context_formatter::render_context;
pub use orchestrator::GraphRagOrchestrator;
pub use query_executor::execute;
pub use schema_introspector::describe_schema;
pub use schema_renderer::render_schema;
