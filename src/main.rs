//! File Context Server entry point.
//!
//! Speaks MCP over stdin/stdout unless `--http` is given.

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use file_context_server::server::serve_stdio;
use file_context_server::{create_router, logging, AppState, Cli, Config, McpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_cli(Cli::parse()).context("invalid configuration")?;
    let _log_guard = logging::init(config.log_level, config.log_dir.as_deref())?;

    info!("Starting File Context Server v{}", env!("CARGO_PKG_VERSION"));
    if config.roots.is_empty() {
        info!("No root directories configured, access is unrestricted");
    } else {
        info!(roots = ?config.roots, "Allowed directories");
    }
    info!(
        "Configuration loaded: blocked_patterns={:?}, cache_size={}, cache_ttl={}s",
        config.blocked_patterns,
        config.cache_size,
        config.cache_ttl.as_secs()
    );

    let server = McpServer::from_config(&config).context("could not build access guard")?;

    if config.http {
        serve_http(&config, server).await?;
    } else {
        info!("Serving MCP on stdio");
        serve_stdio(&server).await.context("stdio transport failed")?;
    }

    info!("Server shutdown complete");
    Ok(())
}

async fn serve_http(config: &Config, server: McpServer) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let app = create_router(AppState::new(server));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {}", addr))?;
    info!("Server listening on http://{}/mcp", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
