mod config;
mod errors;
mod extract;
mod latex;
mod llm_client;
mod models;
mod parse;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Tracing targets use the crate module path (underscores), not
            // the hyphenated package name.
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CVLatex API v{}", env!("CARGO_PKG_VERSION"));

    // Generated .tex/.pdf artifacts land here
    tokio::fs::create_dir_all(&config.output_dir).await?;
    info!("Output directory: {}", config.output_dir.display());

    let state = AppState::new(config.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    if state.compiler.is_available() {
        info!("Local LaTeX engine detected");
    } else {
        info!(
            "No local LaTeX engine; falling back to remote compilation at {}",
            config.latex_remote_url
        );
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
