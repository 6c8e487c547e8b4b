//! LearnSync - landing page with a scripted learning-companion chat
//!
//! Serves the landing page and a rule-based chat demo that walks each
//! visitor through topic, level and style before offering plans, projects
//! and exercises.

mod api;
mod catalog;
mod config;
mod content;
mod session;
mod state_machine;

use api::{create_router, AppState};
use config::ServerConfig;
use session::SessionManager;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "learnsync=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = ServerConfig::from_env()?;
    tracing::info!(
        typing_delay_ms = %config.session.typing_delay.as_millis(),
        session_ttl_secs = config.session.idle_ttl.as_secs(),
        "Configuration loaded"
    );

    // Sessions live in memory only
    let sessions = Arc::new(SessionManager::new(config.session.clone()));
    let _sweeper = sessions.spawn_sweeper();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(AppState::new(sessions))
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = config.addr();
    tracing::info!("LearnSync server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
