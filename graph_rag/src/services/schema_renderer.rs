use crate::models::{PropertySchema, SchemaDescription};

pub const DIRECTIONS_HEADER: &str = "ALWAYS RESPECT THE EDGE DIRECTIONS:";
pub const SEPARATOR: &str = "---";

/// Render the schema as the text embedded in the text2cypher prompt.
///
/// Every edge is listed once in the direction section. The edge property
/// section only lists edges that declare properties. Property types are
/// lowercased; ordering follows the description exactly.
pub fn render_schema(schema: &SchemaDescription) -> String {
    let mut lines = vec![DIRECTIONS_HEADER.to_string(), SEPARATOR.to_string()];

    for edge in &schema.edges {
        lines.push(format!(
            "(:{}) -[:{}]-> (:{})",
            edge.source_label, edge.label, edge.dest_label
        ));
    }
    lines.push(SEPARATOR.to_string());

    lines.push(String::new());
    lines.push("Node properties:".to_string());
    for node in &schema.nodes {
        lines.push(format!("  - {}", node.label));
        push_properties(&mut lines, &node.properties);
    }

    lines.push(String::new());
    lines.push("Edge properties:".to_string());
    for edge in schema.edges.iter().filter(|e| !e.properties.is_empty()) {
        lines.push(format!("- {}", edge.label));
        push_properties(&mut lines, &edge.properties);
    }

    lines.join("\n")
}

fn push_properties(lines: &mut Vec<String>, properties: &[PropertySchema]) {
    for prop in properties {
        lines.push(format!("    - {}: {}", prop.name, prop.data_type.to_lowercase()));
    }
}
