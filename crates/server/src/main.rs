use std::future::IntoFuture;
use std::path::Path;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use boxes_server::api::AppState;
use boxes_server::config::BoxesConfig;
use boxes_server::service::BoxService;

/// Boxes HTTP server.
#[derive(Parser, Debug)]
#[command(name = "boxes-server", about = "HTTP server for the Boxes API")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "boxes.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Commands {
    /// Serve the HTTP API (the default).
    Serve,
    /// Create the boxes table for the configured backend, then exit.
    Migrate,
    /// Drop the boxes table for the configured backend, then exit.
    Rollback,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = BoxesConfig::load(Path::new(&cli.config))?;
    config.apply_env_overrides(|key| std::env::var(key).ok());

    let telemetry_guard = boxes_server::telemetry::init(&config.telemetry, &config.logging);

    if !Path::new(&cli.config).exists() {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Migrate => {
            info!(backend = %config.store.backend, "running store migrations...");
            boxes_server::store_factory::create_store(&config.store).await?;
            info!(backend = %config.store.backend, "store migrations complete");
        }
        Commands::Rollback => {
            info!(backend = %config.store.backend, "reverting store migrations...");
            boxes_server::store_factory::revert_store(&config.store).await?;
            info!(backend = %config.store.backend, "store migrations reverted");
        }
        Commands::Serve => serve(&cli, &config).await?,
    }

    // Flush pending OpenTelemetry spans before exit.
    telemetry_guard.shutdown();
    Ok(())
}

async fn serve(cli: &Cli, config: &BoxesConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = boxes_server::store_factory::create_store(&config.store).await?;
    info!(backend = %config.store.backend, "box store initialized");

    if config.app.debug {
        tracing::warn!("debug mode enabled, 500 responses will include raw diagnostics");
    }

    let state = AppState {
        boxes: BoxService::new(store),
        debug: config.app.debug,
    };
    let app = boxes_server::api::router(state);

    // Resolve the bind address (CLI overrides take precedence).
    let host = cli.host.as_deref().unwrap_or(&config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "boxes-server listening");

    // Serve with graceful shutdown on SIGINT / SIGTERM. Once a signal
    // arrives, in-flight requests get `shutdown_timeout` to drain.
    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = signalled_tx.send(());
            })
            .into_future(),
    );

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    let signalled = tokio::select! {
        joined = &mut server => {
            joined??;
            false
        }
        _ = signalled_rx => true,
    };

    if signalled {
        match tokio::time::timeout(shutdown_timeout, &mut server).await {
            Ok(joined) => joined??,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = config.server.shutdown_timeout_seconds,
                    "shutdown timeout exceeded, dropping in-flight requests"
                );
                server.abort();
            }
        }
    }

    info!("boxes-server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
