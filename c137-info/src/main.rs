//! c137-info - Rick and Morty character service
//!
//! Serves character data from the public character API with retry and
//! fallback, and streams LLM-written "intelligence reports" scraped from the
//! wiki.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use c137_common::config::{load_or_default, ConfigFileResolver, LoggingConfig};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use c137_info::config::{CliOverrides, ServiceConfig};
use c137_info::AppState;

/// Command-line arguments for c137-info
#[derive(Parser, Debug)]
#[command(name = "c137-info")]
#[command(about = "Rick and Morty character service with streamed wiki reports")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "C137_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides config file)
    #[arg(short, long)]
    bind: Option<String>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Offline mode: canned character reports, no wiki or LLM calls
    #[arg(long)]
    dev: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = ConfigFileResolver::new(args.config.clone()).resolve();
    let (toml_config, origin) = load_or_default(config_path.as_deref());

    init_tracing(&toml_config.logging)?;

    info!(
        "Starting c137-info v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    origin.log();

    let overrides = CliOverrides {
        port: args.port,
        bind_address: args.bind,
        dev: args.dev,
    };
    let config = ServiceConfig::resolve(&toml_config, &overrides);

    info!("Character API: {}", config.character_api_base_url);
    info!("Wiki: {}", config.wiki_base_url);
    if config.dev_mode {
        info!("Development mode: character reports are placeholders");
    }

    let state = AppState::from_config(&config).context("Failed to initialize service")?;
    let app = c137_info::build_router(state);

    let listen_address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&listen_address)
        .await
        .with_context(|| format!("Failed to bind to {}", listen_address))?;
    info!("Listening on http://{}", listen_address);
    info!("Health check: http://{}/health", listen_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins; otherwise the configured level for this crate and tower_http
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "c137_info={level},c137_common={level},tower_http={level}",
            level = logging.level
        ))
    });

    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
