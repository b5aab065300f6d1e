use async_trait::async_trait;
use medgraph_config::Neo4jSettings;
use neo4rs::{query, ConfigBuilder, DetachedRowStream, Graph, Query};
use std::collections::BTreeMap;

use super::{GraphStore, RowCursor};
use crate::errors::{GraphRagError, GraphResult};
use crate::models::{EdgeEndpoints, PropertySchema, Row, Value};

const NODE_LABELS: &str = "CALL db.labels() YIELD label RETURN label";

const RELATIONSHIP_TYPES: &str = "CALL db.relationshipTypes() YIELD relationshipType RETURN relationshipType";

const NODE_PROPERTIES: &str = "CALL db.schema.nodeTypeProperties() \
     YIELD nodeLabels, propertyName, propertyTypes \
     WHERE $label IN nodeLabels AND size(nodeLabels) = 1 AND propertyName IS NOT NULL \
     RETURN propertyName, propertyTypes";

const EDGE_PROPERTIES: &str = "CALL db.schema.relTypeProperties() \
     YIELD relType, propertyName, propertyTypes \
     WHERE relType = $rel_type AND propertyName IS NOT NULL \
     RETURN propertyName, propertyTypes";

/// [`GraphStore`] over Neo4j, compatible with both local Neo4j and AuraDB.
///
/// The driver keeps a connection pool, so concurrent read queries from
/// independent questions are fine.
pub struct Neo4jStore {
    graph: Graph,
    uri: String,
}

impl Neo4jStore {
    /// Connect and verify the connection with a trivial query.
    ///
    /// Supported URIs:
    /// - Local: `bolt://localhost:7687`
    /// - AuraDB: `neo4j+s://xxxxx.databases.neo4j.io` or `neo4j+ssc://...`
    pub async fn connect(settings: &Neo4jSettings) -> GraphResult<Self> {
        tracing::info!("🔷 Connecting to Neo4j at: {}", settings.uri);

        let config = ConfigBuilder::default()
            .uri(settings.uri.as_str())
            .user(settings.user.as_str())
            .password(settings.password.as_str())
            .db(settings.database.as_str())
            .fetch_size(settings.fetch_size)
            .max_connections(settings.max_connections)
            .build()
            .map_err(|e| GraphRagError::Neo4j(format!("Failed to build Neo4j config: {}", e)))?;

        let graph = Graph::connect(config)
            .map_err(|e| GraphRagError::Neo4j(format!("Failed to connect to Neo4j: {}", e)))?;

        let mut result = graph
            .execute(query("RETURN 1 AS test"))
            .await
            .map_err(|e| GraphRagError::Neo4j(format!("Connection test failed: {}", e)))?;

        if result.next().await.map_err(|e| GraphRagError::Neo4j(e.to_string()))?.is_some() {
            tracing::info!("✅ Neo4j connection established successfully");
        }

        Ok(Self {
            graph,
            uri: settings.uri.clone(),
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Check if connected to AuraDB
    pub fn is_aura(&self) -> bool {
        self.uri.contains("neo4j.io") || self.uri.starts_with("neo4j+s://") || self.uri.starts_with("neo4j+ssc://")
    }

    async fn catalog_rows(&self, q: Query) -> GraphResult<Vec<neo4rs::Row>> {
        let mut stream = self
            .graph
            .execute(q)
            .await
            .map_err(|e| GraphRagError::SchemaUnavailable(e.to_string()))?;

        let mut rows = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| GraphRagError::SchemaUnavailable(e.to_string()))?
        {
            rows.push(row);
        }
        Ok(rows)
    }

    async fn properties(&self, q: Query) -> GraphResult<Vec<PropertySchema>> {
        let rows = self.catalog_rows(q).await?;
        let mut properties = Vec::with_capacity(rows.len());

        for row in rows {
            let name: String = row
                .get("propertyName")
                .map_err(|e| GraphRagError::SchemaUnavailable(e.to_string()))?;
            let types: Vec<String> = row.get("propertyTypes").unwrap_or_default();
            let data_type = types.into_iter().next().unwrap_or_else(|| "any".to_string());
            properties.push(PropertySchema::new(name, data_type));
        }

        Ok(properties)
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn list_node_labels(&self) -> GraphResult<Vec<String>> {
        let rows = self.catalog_rows(query(NODE_LABELS)).await?;
        rows.iter()
            .map(|row| {
                row.get::<String>("label")
                    .map_err(|e| GraphRagError::SchemaUnavailable(e.to_string()))
            })
            .collect()
    }

    async fn list_edge_labels(&self) -> GraphResult<Vec<EdgeEndpoints>> {
        let type_rows = self.catalog_rows(query(RELATIONSHIP_TYPES)).await?;
        let mut edges = Vec::with_capacity(type_rows.len());

        for type_row in type_rows {
            let rel_type: String = type_row
                .get("relationshipType")
                .map_err(|e| GraphRagError::SchemaUnavailable(format!("relationshipType: {}", e)))?;

            let rows = self.catalog_rows(query(&endpoints_query(&rel_type))).await?;
            if rows.is_empty() {
                tracing::warn!(edge = %rel_type, "Relationship type has no instances, endpoints unknown");
                continue;
            }

            for row in rows {
                let field = |key: &str| {
                    row.get::<String>(key)
                        .map_err(|e| GraphRagError::SchemaUnavailable(format!("{}: {}", key, e)))
                };
                edges.push(EdgeEndpoints::new(rel_type.clone(), field("source")?, field("dest")?));
            }
        }

        Ok(edges)
    }

    async fn describe_table(&self, label: &str) -> GraphResult<Vec<PropertySchema>> {
        let node_properties = self
            .properties(query(NODE_PROPERTIES).param("label", label))
            .await?;
        if !node_properties.is_empty() {
            return Ok(node_properties);
        }

        // relationship types are reported as ":`TYPE`"
        let rel_type = format!(":`{}`", label.replace('`', "``"));
        self.properties(query(EDGE_PROPERTIES).param("rel_type", rel_type)).await
    }

    async fn execute_query(&self, cypher: &str) -> GraphResult<Box<dyn RowCursor>> {
        let stream = self
            .graph
            .execute(query(cypher))
            .await
            .map_err(|e| GraphRagError::query_execution(e.to_string()))?;

        Ok(Box::new(Neo4jRowCursor { stream }))
    }
}

/// Endpoint label pairs of one relationship type, in store scan order
fn endpoints_query(rel_type: &str) -> String {
    format!(
        "MATCH (a)-[:`{}`]->(b) RETURN DISTINCT head(labels(a)) AS source, head(labels(b)) AS dest",
        rel_type.replace('`', "``")
    )
}

/// Rows of a running query.
///
/// The driver hands rows back as field maps, so values come out ordered by
/// column name rather than by their position in the RETURN clause.
struct Neo4jRowCursor {
    stream: DetachedRowStream,
}

#[async_trait]
impl RowCursor for Neo4jRowCursor {
    async fn next_row(&mut self) -> GraphResult<Option<Row>> {
        let Some(row) = self
            .stream
            .next()
            .await
            .map_err(|e| GraphRagError::query_execution(e.to_string()))?
        else {
            return Ok(None);
        };

        let fields: BTreeMap<String, Value> = row
            .to()
            .map_err(|e| GraphRagError::query_execution(format!("Failed to decode row: {}", e)))?;

        Ok(Some(fields.into_values().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_query_is_unsorted() {
        let cypher = endpoints_query("IS_TREATED_BY");
        assert_eq!(
            cypher,
            "MATCH (a)-[:`IS_TREATED_BY`]->(b) RETURN DISTINCT head(labels(a)) AS source, head(labels(b)) AS dest"
        );
        assert!(!cypher.contains("ORDER BY"));
    }

    #[test]
    fn test_endpoints_query_escapes_backticks() {
        assert!(endpoints_query("ODD`TYPE").contains("[:`ODD``TYPE`]"));
    }

    #[test]
    fn test_relationship_types_come_from_catalog() {
        assert!(RELATIONSHIP_TYPES.contains("db.relationshipTypes()"));
        assert!(!RELATIONSHIP_TYPES.contains("ORDER BY"));
    }
}
