//! conftrail HTTP server.

use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use conftrail::server::{AppState, Config, cors_layer, init_logging, router};

/// conftrail HTTP server.
#[derive(Parser, Debug)]
#[command(name = "conftrail-server")]
#[command(about = "Browse and diff archived host configuration snapshots")]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, env = "CONFTRAIL_CONFIG", default_value = "conftrail-server.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::from_file(&args.config)?;
    let bind_addr = config.bind_addr();

    init_logging(&config.logging)?;

    tracing::info!(
        backend = ?config.storage.backend,
        path = %config.storage.path,
        "opening snapshot store"
    );
    let state = AppState::from_config(&config)?;

    let mut app = router(state);

    if let Some(static_path) = &config.server.static_path {
        tracing::info!("Serving static files from: {}", static_path);
        app = app.fallback_service(ServeDir::new(static_path));
    }

    let cors = cors_layer(&config.cors)?;
    tracing::info!(
        enabled = config.cors.enabled,
        origins = ?config.cors.allow_origins,
        "cross-origin policy"
    );

    let app: Router = app.layer(cors).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = bind_addr.parse()?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
