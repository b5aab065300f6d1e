use crate::models::FlattenedContext;

/// Render the flattened values as a JSON array for the answer prompt.
///
/// Strings are quoted, records become objects with sorted keys, and an empty
/// context is `[]`.
pub fn render_context(context: &FlattenedContext) -> String {
    serde_json::to_string(context).unwrap_or_else(|e| {
        tracing::warn!("Failed to render query context: {}", e);
        "[]".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;

    #[test]
    fn test_render_strings() {
        let context: FlattenedContext = vec![Value::from("rash"), Value::from("nausea")].into_iter().collect();
        assert_eq!(render_context(&context), r#"["rash","nausea"]"#);
    }

    #[test]
    fn test_render_mixed_values() {
        let context: FlattenedContext = vec![
            Value::record([("name", Value::from("Prevacid")), ("brand", Value::from(true))]),
            Value::Integer(3),
            Value::Null,
        ]
        .into_iter()
        .collect();

        assert_eq!(render_context(&context), r#"[{"brand":true,"name":"Prevacid"},3,null]"#);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_context(&FlattenedContext::new()), "[]");
    }
}
