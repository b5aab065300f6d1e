use serde::{Deserialize, Serialize};

/// A column of a node or edge table as reported by the store catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

impl PropertySchema {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSchema {
    pub label: String,
    pub properties: Vec<PropertySchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSchema {
    pub label: String,
    pub source_label: String,
    pub dest_label: String,
    pub properties: Vec<PropertySchema>,
}

/// Declared endpoints of an edge table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEndpoints {
    pub label: String,
    pub source: String,
    pub dest: String,
}

impl EdgeEndpoints {
    pub fn new(label: impl Into<String>, source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source: source.into(),
            dest: dest.into(),
        }
    }
}

/// Node and edge tables of the graph, in store catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescription {
    pub nodes: Vec<NodeSchema>,
    pub edges: Vec<EdgeSchema>,
}

impl SchemaDescription {
    pub fn has_node(&self, label: &str) -> bool {
        self.nodes.iter().any(|n| n.label == label)
    }

    /// Edges whose source or destination is not a known node label
    pub fn dangling_edges(&self) -> Vec<&EdgeSchema> {
        self.edges
            .iter()
            .filter(|e| !self.has_node(&e.source_label) || !self.has_node(&e.dest_label))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangling_edges() {
        let schema = SchemaDescription {
            nodes: vec![NodeSchema {
                label: "DrugGeneric".to_string(),
                properties: vec![PropertySchema::new("name", "STRING")],
            }],
            edges: vec![
                EdgeSchema {
                    label: "CAN_CAUSE".to_string(),
                    source_label: "DrugGeneric".to_string(),
                    dest_label: "Symptom".to_string(),
                    properties: vec![],
                },
                EdgeSchema {
                    label: "INTERACTS_WITH".to_string(),
                    source_label: "DrugGeneric".to_string(),
                    dest_label: "DrugGeneric".to_string(),
                    properties: vec![],
                },
            ],
        };

        let dangling = schema.dangling_edges();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].label, "CAN_CAUSE");
    }

    #[test]
    fn test_property_serializes_type_key() {
        let json = serde_json::to_value(PropertySchema::new("name", "STRING")).unwrap();
        assert_eq!(json["type"], "STRING");
    }
}
