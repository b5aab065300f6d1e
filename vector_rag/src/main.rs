use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;

use medgraph_config::AppConfig;
use medgraph_llm::{ChatClient, LlmAnswerSynthesizer};
use medgraph_observability::{error, info, init_tracing, observability, warn, TracingConfig};
use vector_rag::handlers;
use vector_rag::models::{OpenAIEmbeddingClient, RagStatus};
use vector_rag::{SemanticRag, ZillizVectorIndex};

async fn build_semantic_rag(config: &AppConfig) -> anyhow::Result<SemanticRag> {
    let embedder = Arc::new(OpenAIEmbeddingClient::new(&config.vector)?);
    info!("[Semantic RAG] Query embeddings from {}", embedder.model());

    let index = Arc::new(ZillizVectorIndex::new(&config.vector, embedder)?);
    info!("[Semantic RAG] Using collection '{}'", index.collection());

    let chat = ChatClient::new(&config.llm).context("Failed to initialize LLM client")?;
    let synthesizer = Arc::new(LlmAnswerSynthesizer::new(Arc::new(chat), &config.llm));

    Ok(SemanticRag::new(index, synthesizer, &config.rag).await?)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(TracingConfig::for_service("vector-rag"));

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let host = config.server.host.clone();
    let port = config.server.vector_rag_port;

    info!("Starting semantic RAG service on {}:{}", host, port);

    info!("[Semantic RAG] Enabled features: {:?}", config.feature_toggles.enabled_features());
    let enabled = config.feature_toggles.semantic_rag_enabled();

    let semantic_rag = if enabled {
        match build_semantic_rag(&config).await {
            Ok(rag) => {
                info!("✅ [Semantic RAG] Vector index ready");
                Some(web::Data::new(rag))
            }
            Err(e) => {
                error!("❌ [Semantic RAG] Failed to initialize: {:#}", e);
                None
            }
        }
    } else {
        warn!("SemanticRag disabled; skipping vector index initialization.");
        None
    };

    let status = RagStatus {
        available: semantic_rag.is_some(),
        reason: match (&semantic_rag, enabled) {
            (Some(_), _) => None,
            (None, true) => Some("index_unavailable".to_string()),
            (None, false) => Some("disabled".to_string()),
        },
    };
    let status = web::Data::new(status);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        let app = App::new()
            .wrap(cors)
            .wrap(observability("vector-rag"))
            .app_data(status.clone());

        match &semantic_rag {
            Some(rag) => app.app_data(rag.clone()).configure(handlers::configure),
            None => app.configure(handlers::configure_disabled),
        }
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
