//! Edge router binary: load config, bind entrypoints, serve.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hub_router::config::{load_config, ConfigWatcher, Interpolator};
use hub_router::http::HttpServer;
use hub_router::lifecycle::Shutdown;
use hub_router::observability::metrics;

#[derive(Debug, Parser)]
#[command(name = "hub-router", about = "Rule-based HTTP edge router")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, short, default_value = "router.toml")]
    config: PathBuf,

    /// Watch the configuration file and hot-reload the rule table.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hub_router=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("hub-router v0.1.0 starting");

    let interp = Interpolator::from_env().with_hub_defaults();
    let config = match load_config(&args.config, &interp) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = ?args.config, error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        routes = config.routes.len(),
        services = config.services.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Bind every configured entrypoint before serving any of them.
    let mut listeners = Vec::new();
    for (entrypoint, addr) in config.entrypoints.bindings() {
        match TcpListener::bind(addr).await {
            Ok(listener) => listeners.push((entrypoint, listener)),
            Err(e) => {
                tracing::error!(entrypoint = %entrypoint, address = %addr, error = %e, "Failed to bind entrypoint");
                return ExitCode::FAILURE;
            }
        }
    }
    if listeners.is_empty() {
        tracing::error!("No entrypoints configured, nothing to serve");
        return ExitCode::FAILURE;
    }

    // Hot reload: the watcher re-loads and re-validates on change; the
    // server swaps the rule table snapshot.
    let (config_updates, _watcher_guard, _idle_tx) = if args.watch {
        let (watcher, updates) = ConfigWatcher::new(&args.config, interp.clone());
        match watcher.run() {
            Ok(guard) => (updates, Some(guard), None),
            Err(e) => {
                tracing::error!(error = %e, "Failed to start config watcher");
                return ExitCode::FAILURE;
            }
        }
    } else {
        // Keep the sender alive so the reload loop idles instead of closing.
        let (tx, updates) = tokio::sync::mpsc::unbounded_channel();
        (updates, None, Some(tx))
    };

    let server = match HttpServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to compile rule table");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
        }
        shutdown.trigger();
    });

    if let Err(e) = server.run(listeners, config_updates, server_shutdown).await {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
