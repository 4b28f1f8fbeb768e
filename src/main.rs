//! PDF/UA Server
//!
//! Upload a PDF, get back a PDF/UA-flagged copy.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdfua_server::{routes, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    let config_result = Config::from_env();
    let debug = config_result.as_ref().map(|c| c.debug).unwrap_or(false);

    // Initialize tracing
    let default_filter = if debug {
        "pdfua_server=debug,tower_http=debug"
    } else {
        "pdfua_server=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config_result.unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting PDF/UA Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Scratch directory: {}", config.workspace.resolved_dir().display());
    tracing::info!("Upload limit: {}MB", config.upload.max_megabytes());

    let app_state = AppState::new(config.clone());

    let tools = app_state.converter().tool_status().await;
    match &tools.converter {
        Some(version) => tracing::info!("Converter {} version {}", config.tools.converter, version),
        None => tracing::warn!(
            "Converter {} not available; conversions will fail until it is installed",
            config.tools.converter
        ),
    }
    match (&tools.validator, config.tools.validate_output) {
        (_, false) => tracing::info!("Output validation disabled"),
        (Some(version), true) => {
            tracing::info!("Validator {} version {}", config.tools.validator, version)
        }
        (None, true) => tracing::warn!(
            "Validator {} not available; output will not be validated",
            config.tools.validator
        ),
    }

    // Build router
    let app = routes::router(app_state).layer(TraceLayer::new_for_http());

    // Start server with graceful shutdown
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid SERVER_HOST: {}", config.server.host))?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("PDF/UA Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
