use async_trait::async_trait;
use medgraph_config::VectorSettings;
use medgraph_models::Chunk;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{VectorRagError, VectorResult};
use crate::models::EmbeddingClient;

/// Nearest-neighbour lookup over an indexed chunk collection
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Whether the backing collection exists
    async fn is_available(&self) -> VectorResult<bool>;

    /// The `top_k` chunks closest to the question, closest first
    async fn query(&self, question: &str, top_k: usize) -> VectorResult<Vec<Chunk>>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    collection_name: &'a str,
    vector: Vec<f32>,
    limit: usize,
    output_fields: Vec<&'a str>,
}

#[derive(Debug, Deserialize, Default)]
struct ZillizResponse<T: Default> {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub distance: f32,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// [`VectorIndex`] over the Zilliz Cloud REST API.
///
/// Questions are embedded with the configured [`EmbeddingClient`] before the
/// search, so the collection must have been built with the same model.
pub struct ZillizVectorIndex {
    client: Client,
    base_url: String,
    api_key: String,
    collection: String,
    text_field: String,
    embedder: Arc<dyn EmbeddingClient>,
}

impl ZillizVectorIndex {
    pub fn new(settings: &VectorSettings, embedder: Arc<dyn EmbeddingClient>) -> VectorResult<Self> {
        let endpoint = settings
            .endpoint
            .as_deref()
            .ok_or_else(|| VectorRagError::IndexUnavailable("ZILLIZ_ENDPOINT is not set".to_string()))?;
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| VectorRagError::IndexUnavailable("ZILLIZ_API_KEY is not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        let base_url = endpoint.trim_end_matches('/').to_string();
        tracing::info!("🔷 Zilliz Cloud client initialized for endpoint: {}", base_url);

        Ok(Self {
            client,
            base_url,
            api_key,
            collection: settings.collection.clone(),
            text_field: settings.text_field.clone(),
            embedder,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v1/vector{}", self.base_url, path)
    }

    async fn post<T: Serialize, R: for<'de> Deserialize<'de> + Default>(
        &self,
        path: &str,
        body: &T,
    ) -> VectorResult<ZillizResponse<R>> {
        let response = self
            .client
            .post(self.api_url(path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VectorRagError::Search(format!("Zilliz API error ({}): {}", status, error_text)));
        }

        let response_body: ZillizResponse<R> = response.json().await?;

        if response_body.code != 200 && response_body.code != 0 {
            return Err(VectorRagError::Search(format!(
                "Zilliz API error (code {}): {}",
                response_body.code,
                response_body.message.unwrap_or_else(|| "Unknown error".to_string())
            )));
        }

        Ok(response_body)
    }

    pub async fn collection_exists(&self) -> VectorResult<bool> {
        let url = format!(
            "{}?collectionName={}",
            self.api_url("/collections/describe"),
            urlencoding::encode(&self.collection)
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        if response.status().as_u16() == 404 {
            return Ok(false);
        }

        let body: ZillizResponse<Value> = response.json().await?;

        // code 0 or 200 means the collection was described
        Ok(body.code == 0 || body.code == 200)
    }

    pub async fn search(&self, vector: Vec<f32>, top_k: usize) -> VectorResult<Vec<SearchResult>> {
        let request = SearchRequest {
            collection_name: &self.collection,
            vector,
            limit: top_k,
            output_fields: vec![self.text_field.as_str()],
        };

        let response: ZillizResponse<Vec<Value>> = self.post("/search", &request).await?;

        let hits = response.data.unwrap_or_default();
        let total = hits.len();
        let results: Vec<SearchResult> = hits.into_iter().filter_map(parse_hit).collect();
        if results.len() < total {
            tracing::warn!(
                "{} search hits had no numeric 'distance' and were skipped",
                total - results.len()
            );
        }

        Ok(results)
    }

    fn to_chunk(&self, result: SearchResult) -> Option<Chunk> {
        let document = result.fields.get(&self.text_field)?.as_str()?;
        Some(Chunk::new(document, result.distance))
    }
}

fn parse_hit(hit: Value) -> Option<SearchResult> {
    let Value::Object(mut fields) = hit else {
        return None;
    };
    let distance = fields.remove("distance")?.as_f64()? as f32;
    let id = match fields.remove("id") {
        Some(Value::String(id)) => id,
        Some(other) => other.to_string(),
        None => String::new(),
    };

    Some(SearchResult { id, distance, fields })
}

#[async_trait]
impl VectorIndex for ZillizVectorIndex {
    async fn is_available(&self) -> VectorResult<bool> {
        self.collection_exists().await
    }

    async fn query(&self, question: &str, top_k: usize) -> VectorResult<Vec<Chunk>> {
        let vector = self.embedder.embed(question).await?;
        let results = self.search(vector, top_k).await?;
        let total = results.len();

        let chunks: Vec<Chunk> = results.into_iter().filter_map(|r| self.to_chunk(r)).collect();
        if chunks.len() < total {
            tracing::warn!(
                "{} search hits had no '{}' field and were skipped",
                total - chunks.len(),
                self.text_field
            );
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingClient for FixedEmbedder {
        async fn embed(&self, _text: &str) -> VectorResult<Vec<f32>> {
            Ok(vec![0.5, 0.5])
        }
    }

    fn index(endpoint: String) -> ZillizVectorIndex {
        let settings = VectorSettings {
            endpoint: Some(endpoint),
            api_key: Some("zilliz-key".to_string()),
            collection: "drug_interactions".to_string(),
            text_field: "text".to_string(),
            embedding_base_url: "http://unused".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_api_key: None,
            timeout_secs: 5,
        };
        ZillizVectorIndex::new(&settings, Arc::new(FixedEmbedder)).unwrap()
    }

    #[tokio::test]
    async fn test_query_keeps_ranked_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/vector/search"))
            .and(body_partial_json(json!({ "collectionName": "drug_interactions", "limit": 2 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "data": [
                    { "id": 7, "distance": 0.12, "text": "Warfarin and ibuprofen raise bleeding risk." },
                    { "id": 3, "distance": 0.34, "text": "Ibuprofen is an NSAID." }
                ]
            })))
            .mount(&server)
            .await;

        let chunks = index(server.uri()).query("Does ibuprofen interact with warfarin?", 2).await.unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].document, "Warfarin and ibuprofen raise bleeding risk.");
        assert_eq!(chunks[1].document, "Ibuprofen is an NSAID.");
        assert!(chunks[0].distance < chunks[1].distance);
    }

    #[tokio::test]
    async fn test_hits_without_distance_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/vector/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "data": [
                    { "id": 1, "text": "Metformin lowers blood sugar." },
                    { "id": 2, "distance": 0.2, "text": "Lansoprazole reduces stomach acid." }
                ]
            })))
            .mount(&server)
            .await;

        let index = index(server.uri());
        let results = index.search(vec![0.5, 0.5], 2).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "2");

        let chunks = index.query("What does lansoprazole do?", 2).await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].document, "Lansoprazole reduces stomach acid.");
    }

    #[tokio::test]
    async fn test_missing_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/vector/collections/describe"))
            .and(query_param("collectionName", "drug_interactions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 100,
                "message": "can't find collection"
            })))
            .mount(&server)
            .await;

        assert!(!index(server.uri()).is_available().await.unwrap());
    }

    #[tokio::test]
    async fn test_error_code_is_search_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/vector/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 1100,
                "message": "invalid dimension"
            })))
            .mount(&server)
            .await;

        let err = index(server.uri()).query("question", 2).await.unwrap_err();
        assert!(matches!(err, VectorRagError::Search(msg) if msg.contains("invalid dimension")));
    }

    #[test]
    fn test_requires_endpoint() {
        let settings = VectorSettings {
            endpoint: None,
            api_key: Some("zilliz-key".to_string()),
            collection: "drug_interactions".to_string(),
            text_field: "text".to_string(),
            embedding_base_url: "http://unused".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_api_key: None,
            timeout_secs: 5,
        };

        assert!(matches!(
            ZillizVectorIndex::new(&settings, Arc::new(FixedEmbedder)),
            Err(VectorRagError::IndexUnavailable(_))
        ));
    }
}
