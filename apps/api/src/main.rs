mod config;
mod db;
mod errors;
mod interview;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::interview::covers::RandomCoverPicker;
use crate::interview::generator::InterviewGenerator;
use crate::interview::store::PgDocumentStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL-backed document store
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;
    let store = Arc::new(PgDocumentStore::new(db));

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(
        config.anthropic_api_key.clone(),
        config.llm_model.clone(),
    ));
    info!("LLM client initialized (model: {})", llm.model());

    let covers = Arc::new(RandomCoverPicker::new(config.cover_images.clone()));

    let generator = InterviewGenerator::new(llm, store, covers, config.interview_collection.clone());
    info!(
        "Interviews will be stored in collection '{}'",
        config.interview_collection
    );

    // Build app state
    let state = AppState { generator };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
