use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use jazykovy_ai::config::{Config, LISTEN_HOST};
use jazykovy_ai::utils::logging::init_logging;
use jazykovy_ai::{AppState, build_router};

#[derive(Debug, Parser)]
#[command(name = "jazykovy-ai", version, about = "Language tutor chat backend")]
struct Args {
    /// Path to a config.toml (default: conf/config.toml or ./config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Listening port; overrides config and the PORT variable
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // .env is optional
    let _ = dotenvy::dotenv();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let _log_guard = init_logging(&config.logging)?;
    tracing::debug!("Effective configuration: {:?}", config);

    let state = Arc::new(AppState::from_config(&config)?);
    if !state.tutor_service.is_available() {
        tracing::warn!("⚠️  OPENAI_API_KEY is not set, /ask will answer with HTTP 500");
    }
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", LISTEN_HOST, config.server.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Jazykový AI listening on http://{}", addr);
    tracing::info!("API docs at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
