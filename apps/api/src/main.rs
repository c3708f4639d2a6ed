mod collaborators;
mod config;
mod errors;
mod evaluation;
mod feedback;
mod form;
mod models;
mod pdf;
mod routes;
mod state;
mod theme;
mod validation;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::collaborators::anthropic::AnthropicClient;
use crate::config::Config;
use crate::form::store::SessionStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::theme::ThemeStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeFlow API v{}", env!("CARGO_PKG_VERSION"));

    // Durable theme preference lives under DATA_DIR
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "Failed to create data directory {}",
            config.data_dir.display()
        )
    })?;
    let theme = ThemeStore::open(config.data_dir.join("preferences.json"));
    info!(
        "Theme preference store ready under {}",
        config.data_dir.display()
    );

    // One LLM client backs both collaborator seams
    let llm = Arc::new(AnthropicClient::new(config.anthropic_api_key.clone()));
    info!(
        "LLM client initialized (model: {})",
        collaborators::anthropic::MODEL
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        sessions: SessionStore::default(),
        summarizer: llm.clone(),
        evaluator: llm,
        theme,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
