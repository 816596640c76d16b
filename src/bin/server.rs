//! StrataKV Server Binary
//!
//! Starts the HTTP server for StrataKV.

use std::sync::Arc;

use clap::Parser;
use stratakv::http::Server;
use stratakv::{Config, StorageFacade};
use tracing_subscriber::{fmt, EnvFilter};

/// StrataKV Server
#[derive(Parser, Debug)]
#[command(name = "stratakv-server")]
#[command(about = "Embedded key-value store with filtered, paginated listing over HTTP")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./stratakv_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Engine cache size in MB
    #[arg(short = 'c', long, default_value = "64")]
    cache_mb: usize,

    /// Deadline for a single list request in milliseconds (0 disables it)
    #[arg(short = 't', long, default_value = "5000")]
    request_timeout_ms: u64,

    /// How long to wait for in-flight requests on shutdown, in milliseconds
    #[arg(long, default_value = "5000")]
    shutdown_timeout_ms: u64,

    /// Page size used when a list request doesn't give one
    #[arg(long, default_value = "10")]
    page_size: usize,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stratakv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("StrataKV Server v{}", stratakv::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .cache_size_bytes(args.cache_mb * 1024 * 1024)
        .request_timeout_ms(args.request_timeout_ms)
        .shutdown_timeout_ms(args.shutdown_timeout_ms)
        .default_page_size(args.page_size)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(2);
    }

    // Open store
    let store = match StorageFacade::open(&config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Store opened at {}", store.path().display());

    // Start server; it closes the store once drained
    let server = Server::new(config, store);
    if let Err(e) = server.run(shutdown_signal()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Resolves on Ctrl+C
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, initiating shutdown..."),
        Err(e) => {
            // Without a signal handler there is no way to stop gracefully;
            // keep serving until the process is killed.
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
