use crate::errors::{GraphRagError, GraphResult};
use crate::graph_db::GraphStore;
use crate::models::FlattenedContext;

/// Run a candidate query and flatten its rows into distinct values.
///
/// Values are kept in order of first appearance across all rows; later
/// values structurally equal to an earlier one are dropped. Any store
/// failure, whether at submission or while reading rows, is a
/// `QueryExecution` error.
pub async fn execute(store: &dyn GraphStore, query: &str) -> GraphResult<FlattenedContext> {
    let mut cursor = store.execute_query(query).await.map_err(execution_error)?;

    let mut context = FlattenedContext::new();
    let mut row_count = 0usize;

    while let Some(row) = cursor.next_row().await.map_err(execution_error)? {
        row_count += 1;
        for value in row {
            context.push_distinct(value);
        }
    }

    tracing::debug!(rows = row_count, distinct_values = context.len(), "Query executed");

    Ok(context)
}

fn execution_error(err: GraphRagError) -> GraphRagError {
    match err {
        GraphRagError::QueryExecution { .. } => err,
        other => GraphRagError::query_execution(other.to_string()),
    }
}
