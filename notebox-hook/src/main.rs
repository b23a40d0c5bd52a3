//! notebox-hook - webhook receiver for zip uploads and playlist notes
//!
//! Endpoints:
//! - `POST /webhook`       zip upload, raw zip body, or notes request
//! - `POST /webhook-test`  echo diagnostic
//! - `POST /download-zip`  fetch a stored archive
//! - `GET  /health`, `GET /build_info`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use notebox_common::config::{default_config_path, TomlConfig, UploadFolderInitializer};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notebox_hook::config::{CliOverrides, ServiceConfig};
use notebox_hook::{build_router, AppState};

/// Command-line arguments for notebox-hook
#[derive(Parser, Debug)]
#[command(name = "notebox-hook")]
#[command(about = "Webhook receiver for zip uploads and playlist notes")]
#[command(version)]
struct Args {
    /// Host to bind
    #[arg(long, env = "NOTEBOX_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "NOTEBOX_PORT")]
    port: Option<u16>,

    /// Folder for uploaded and generated archives
    #[arg(short, long)]
    upload_folder: Option<PathBuf>,

    /// Bootstrap TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Loaded before tracing so its log level can seed the filter; the
    // outcome is logged once the subscriber is up.
    let config_path = args
        .config
        .clone()
        .or_else(|| default_config_path("notebox-hook"));
    let toml_result = config_path
        .as_deref()
        .filter(|path| path.exists())
        .map(TomlConfig::load);
    let toml_config = match &toml_result {
        Some(Ok(config)) => config.clone(),
        _ => TomlConfig::default(),
    };

    // RUST_LOG wins; otherwise the TOML log level applies to this crate
    let default_filter = format!(
        "notebox_hook={},tower_http={}",
        toml_config.logging.level, toml_config.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting notebox-hook v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match (&toml_result, &config_path) {
        (Some(Ok(_)), Some(path)) => info!("Loaded config from {}", path.display()),
        (Some(Err(e)), _) => warn!("Ignoring config file, using defaults: {}", e),
        _ => info!("No config file found, using defaults"),
    }

    let config = ServiceConfig::resolve(
        CliOverrides {
            host: args.host,
            port: args.port,
            upload_folder: args.upload_folder,
        },
        &toml_config,
    );

    let initializer = UploadFolderInitializer::new(config.upload_folder.clone());
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize upload folder")?;
    info!("Upload folder: {}", config.upload_folder.display());

    let app = build_router(AppState::from_config(&config));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
