mod changes;
mod config;
mod errors;
mod export;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;
mod store;
mod tailoring;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::HttpExporter;
use crate::routes::build_router;
use crate::session::SharedSession;
use crate::state::AppState;
use crate::store::DocumentStore;
use crate::tailoring::gateway::LlmTailor;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    let store = DocumentStore::new(&config.resumes_dir);
    info!("Resume store: {}", store.root().display());

    // Gateways start even when unconfigured; their operations report it.
    let tailor = Arc::new(LlmTailor::from_config(&config)?);
    let exporter = Arc::new(HttpExporter::from_config(&config)?);

    let state = AppState {
        config: config.clone(),
        store,
        session: SharedSession::default(),
        tailor,
        exporter,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
