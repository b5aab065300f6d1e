use actix_web::{web, HttpRequest, HttpResponse};
use medgraph_observability::request_id;

use crate::errors::VectorResult;
use crate::models::SemanticAskRequest;
use crate::services::SemanticRag;

pub async fn semantic_ask(
    req: HttpRequest,
    rag: web::Data<SemanticRag>,
    body: web::Json<SemanticAskRequest>,
) -> VectorResult<HttpResponse> {
    let depth = body.depth.unwrap_or_else(|| rag.default_depth());

    tracing::info!(
        request_id = ?request_id(&req),
        depth = depth,
        "🔍 [Semantic RAG] Question received"
    );

    let answer = rag.run(&body.question, depth).await?;
    Ok(HttpResponse::Ok().json(answer))
}
