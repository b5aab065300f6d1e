use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;

use graph_rag::{handlers, GraphRagOrchestrator, Neo4jStore};
use medgraph_config::AppConfig;
use medgraph_llm::{ChatClient, LlmAnswerSynthesizer, LlmCypherTranslator};
use medgraph_observability::{error, info, init_tracing, observability, TracingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(TracingConfig::for_service("graph-rag"));

    let config = AppConfig::from_env().context("Invalid configuration")?;

    info!("🔷 [Graph RAG] Connecting to Neo4j at {}...", config.neo4j.uri);
    let store = Neo4jStore::connect(&config.neo4j)
        .await
        .context("Failed to connect to Neo4j")?;
    if store.is_aura() {
        info!("[Graph RAG] Using Neo4j AuraDB at {}", store.uri());
    }

    let chat = Arc::new(ChatClient::new(&config.llm).context("Failed to initialize LLM client")?);
    info!("[Graph RAG] LLM endpoint: {}", chat.base_url());

    let translator = Arc::new(LlmCypherTranslator::new(chat.clone(), &config.llm));
    let synthesizer = Arc::new(LlmAnswerSynthesizer::new(chat, &config.llm));

    let orchestrator = match GraphRagOrchestrator::new(Arc::new(store), translator, synthesizer, &config.rag).await {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!("❌ [Graph RAG] Cannot start without a graph schema: {}", e);
            return Err(e.into());
        }
    };
    info!(
        "✅ [Graph RAG] Schema loaded: {} node tables, {} edge tables",
        orchestrator.schema().nodes.len(),
        orchestrator.schema().edges.len()
    );

    let orchestrator = web::Data::new(orchestrator);
    info!("[Graph RAG] Enabled features: {:?}", config.feature_toggles.enabled_features());
    let toggles = web::Data::new(config.feature_toggles.clone());
    let host = config.server.host.clone();
    let port = config.server.graph_rag_port;

    info!("🚀 [Graph RAG] Starting on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(orchestrator.clone())
            .app_data(toggles.clone())
            .wrap(cors)
            .wrap(observability("graph-rag"))
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
