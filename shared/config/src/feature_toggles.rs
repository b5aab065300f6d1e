use serde::Deserialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct FeatureToggles {
    #[serde(flatten)]
    pub flags: HashMap<String, bool>,
}

impl FeatureToggles {
    // Load from a provided path or env var FEATURE_TOGGLES_PATH, defaulting to ./feature-toggles.json
    pub fn from_path(path: Option<String>) -> Self {
        let default_path = std::env::var("FEATURE_TOGGLES_PATH")
            .unwrap_or_else(|_| "feature-toggles.json".to_string());
        let path = path.unwrap_or(default_path);

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(toggles) => toggles,
                Err(e) => {
                    tracing::warn!("Ignoring malformed feature toggles at {}: {}", path, e);
                    FeatureToggles::default()
                }
            },
            Err(_) => FeatureToggles::default(),
        }
    }

    pub fn is_enabled_or(&self, name: &str, default: bool) -> bool {
        self.flags.get(name).copied().unwrap_or(default)
    }

    // Semantic (vector) RAG path; on unless explicitly switched off
    pub fn semantic_rag_enabled(&self) -> bool {
        self.is_enabled_or("SemanticRag", true)
    }

    // Expose the graph schema text over HTTP; off by default
    pub fn schema_endpoint_enabled(&self) -> bool {
        self.is_enabled_or("SchemaEndpoint", false)
    }

    // Get all enabled features
    pub fn enabled_features(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .flags
            .iter()
            .filter(|(_, &enabled)| enabled)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"SemanticRag": false, "SchemaEndpoint": true}}"#).unwrap();

        let toggles = FeatureToggles::from_path(Some(file.path().display().to_string()));

        assert!(!toggles.semantic_rag_enabled());
        assert!(toggles.schema_endpoint_enabled());
        assert_eq!(toggles.enabled_features(), vec!["SchemaEndpoint".to_string()]);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let toggles = FeatureToggles::from_path(Some("/nonexistent/feature-toggles.json".to_string()));

        assert!(toggles.semantic_rag_enabled());
        assert!(!toggles.schema_endpoint_enabled());
        assert!(!toggles.is_enabled_or("Anything", false));
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let toggles = FeatureToggles::from_path(Some(file.path().display().to_string()));

        assert!(toggles.flags.is_empty());
    }
}
