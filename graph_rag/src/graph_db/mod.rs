//! Graph store boundary.
//!
//! The pipeline only needs catalog enumeration and read queries, so the
//! store is reached through [`GraphStore`] and rows come back through a
//! [`RowCursor`]. [`Neo4jStore`] is the production implementation.

pub mod neo4j_client;

use async_trait::async_trait;

use crate::errors::GraphResult;
use crate::models::{EdgeEndpoints, PropertySchema, Row};

pub use neo4j_client::Neo4jStore;

#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Node table labels in catalog order
    async fn list_node_labels(&self) -> GraphResult<Vec<String>>;

    /// Edge tables with their declared endpoints, in catalog order
    async fn list_edge_labels(&self) -> GraphResult<Vec<EdgeEndpoints>>;

    /// Columns of a node or edge table, in catalog order
    async fn describe_table(&self, label: &str) -> GraphResult<Vec<PropertySchema>>;

    /// Run a read query; failures to plan or start it surface here
    async fn execute_query(&self, query: &str) -> GraphResult<Box<dyn RowCursor>>;
}

#[async_trait]
pub trait RowCursor: Send {
    /// Next row, or `None` once the cursor is exhausted
    async fn next_row(&mut self) -> GraphResult<Option<Row>>;
}
