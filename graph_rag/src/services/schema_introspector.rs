use crate::errors::{GraphRagError, GraphResult};
use crate::graph_db::GraphStore;
use crate::models::{EdgeSchema, NodeSchema, SchemaDescription};

/// Read node and edge tables from the store catalog.
///
/// Labels and properties keep the order the store reports them in. Edges
/// whose endpoints are not known node labels are kept and logged.
pub async fn describe_schema(store: &dyn GraphStore) -> GraphResult<SchemaDescription> {
    let node_labels = store.list_node_labels().await.map_err(unavailable)?;
    if node_labels.is_empty() {
        return Err(GraphRagError::SchemaUnavailable(
            "store has no node tables".to_string(),
        ));
    }

    let mut nodes = Vec::with_capacity(node_labels.len());
    for label in node_labels {
        let properties = store.describe_table(&label).await.map_err(unavailable)?;
        nodes.push(NodeSchema { label, properties });
    }

    let endpoints = store.list_edge_labels().await.map_err(unavailable)?;
    let mut edges = Vec::with_capacity(endpoints.len());
    for endpoint in endpoints {
        let properties = store.describe_table(&endpoint.label).await.map_err(unavailable)?;
        edges.push(EdgeSchema {
            label: endpoint.label,
            source_label: endpoint.source,
            dest_label: endpoint.dest,
            properties,
        });
    }

    let schema = SchemaDescription { nodes, edges };

    for edge in schema.dangling_edges() {
        tracing::warn!(
            edge = %edge.label,
            source = %edge.source_label,
            dest = %edge.dest_label,
            "Edge references a node label missing from the catalog"
        );
    }

    tracing::debug!(
        nodes = schema.nodes.len(),
        edges = schema.edges.len(),
        "Graph schema described"
    );

    Ok(schema)
}

fn unavailable(err: GraphRagError) -> GraphRagError {
    match err {
        GraphRagError::SchemaUnavailable(_) => err,
        other => GraphRagError::SchemaUnavailable(other.to_string()),
    }
}
