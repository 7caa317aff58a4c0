// ABOUTME: Entry point for the encore binary.
// ABOUTME: Parses CLI arguments, initializes tracing, loads config, and starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;

use encore_server::{AppState, EncoreConfig, create_router};

/// Music-streaming companion backend.
#[derive(Debug, Parser)]
#[command(name = "encore", version, about)]
struct Cli {
    /// Socket address to bind, overriding ENCORE_BIND.
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore=debug,tower_http=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = EncoreConfig::from_env()?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }

    let state = Arc::new(AppState::from_config(&config)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(bind = %config.bind, "encore listening");
    axum::serve(listener, app).await?;

    Ok(())
}
