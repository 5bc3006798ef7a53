mod clients;
mod config;
mod errors;
mod models;
mod profile;
mod routes;
mod state;
mod workflow;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::clients::parse::{HttpParseService, ParseService};
use crate::clients::store::{HttpResumeStore, ResumeStore};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::session::SessionRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeDesk API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize external service clients
    let parse: Arc<dyn ParseService> = Arc::new(HttpParseService::new(&config.parse_service_url));
    info!("Parse service client initialized ({})", config.parse_service_url);

    let store: Arc<dyn ResumeStore> = Arc::new(HttpResumeStore::new(&config.storage_service_url));
    info!(
        "Storage backend client initialized ({})",
        config.storage_service_url
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        parse,
        store,
        sessions: SessionRegistry::new(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // matches the backend's open CORS policy

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
