use actix_web::{web, HttpRequest, HttpResponse};
use medgraph_config::feature_toggles::FeatureToggles;
use medgraph_observability::request_id;
use serde::{Deserialize, Serialize};

use crate::errors::{GraphRagError, GraphResult};
use crate::models::OrchestratorResult;
use crate::services::GraphRagOrchestrator;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub questions: Vec<String>,
}

/// One entry of a batch response: the result, or the error for that question
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Result(OrchestratorResult),
    Error { question: String, error: String },
}

pub async fn ask(
    req: HttpRequest,
    orchestrator: web::Data<GraphRagOrchestrator>,
    body: web::Json<AskRequest>,
) -> GraphResult<HttpResponse> {
    tracing::info!(
        request_id = ?request_id(&req),
        question = %body.question,
        "🔍 [Graph RAG] Question received"
    );

    let result = orchestrator.ask(&body.question).await?;
    Ok(HttpResponse::Ok().json(result))
}

pub async fn batch(
    orchestrator: web::Data<GraphRagOrchestrator>,
    body: web::Json<BatchRequest>,
) -> GraphResult<HttpResponse> {
    if body.questions.is_empty() {
        return Err(GraphRagError::InvalidRequest("no questions provided".to_string()));
    }

    tracing::info!("🔍 [Graph RAG] Batch of {} questions", body.questions.len());

    let entries: Vec<BatchEntry> = orchestrator
        .run(&body.questions)
        .await
        .into_iter()
        .zip(body.questions.iter())
        .map(|(result, question)| match result {
            Ok(result) => BatchEntry::Result(result),
            Err(e) => BatchEntry::Error {
                question: question.clone(),
                error: e.to_string(),
            },
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({ "results": entries })))
}

pub async fn schema(
    orchestrator: web::Data<GraphRagOrchestrator>,
    toggles: web::Data<FeatureToggles>,
) -> GraphResult<HttpResponse> {
    if !toggles.schema_endpoint_enabled() {
        return Err(GraphRagError::Disabled("SchemaEndpoint".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "schema": orchestrator.schema(),
        "schema_text": orchestrator.schema_text(),
    })))
}

pub async fn health(orchestrator: web::Data<GraphRagOrchestrator>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "graph_rag",
        "node_tables": orchestrator.schema().nodes.len(),
        "edge_tables": orchestrator.schema().edges.len(),
    }))
}
