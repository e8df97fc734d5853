// ABOUTME: Server binary wiring configuration, logging, provider, cache, and routes
// ABOUTME: Supports the HTTP upstream provider or synthetic fixtures via --synthetic

//! # Paddock Server Binary
//!
//! Starts the F1 analytics REST API: loads configuration from the
//! environment, initializes structured logging, selects the timing
//! provider, and serves the router.

use anyhow::Result;
use clap::Parser;
use paddock_server::{
    cache::InMemorySessionCache,
    config::ServerConfig,
    logging,
    providers::{OpenF1Provider, SessionLoader, SyntheticProvider, TimingProvider},
    routes::{router, AppState},
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "paddock-server")]
#[command(about = "Paddock - F1 timing and telemetry analytics API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Serve the built-in demo session instead of the HTTP upstream
    #[arg(long)]
    synthetic: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting Paddock server");
    info!("{}", config.summary());

    let provider: Arc<dyn TimingProvider> = if args.synthetic {
        info!("Using synthetic provider with the built-in demo session");
        Arc::new(SyntheticProvider::demo())
    } else {
        Arc::new(OpenF1Provider::new(&config.upstream)?)
    };

    let loader = SessionLoader::new(provider, Arc::new(InMemorySessionCache::new()));
    let state = Arc::new(AppState {
        loader,
        config: config.clone(),
    });

    display_available_endpoints(&config);

    let addr = format!("{}:{}", config.host, config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolve on ctrl-c so axum can drain in-flight requests
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Display all available API endpoints
fn display_available_endpoints(config: &ServerConfig) {
    let host = &config.host;
    let port = config.http_port;

    info!("=== Available API Endpoints ===");
    info!("   Service Info:     GET http://{host}:{port}/");
    info!("   Health Check:     GET http://{host}:{port}/health");
    info!("   Race Schedule:    GET http://{host}:{port}/races/{{year}}");
    info!("   Race Drivers:     GET http://{host}:{port}/drivers/{{year}}/{{round}}");
    info!("   Driver Laps:      GET http://{host}:{port}/laps/{{year}}/{{round}}/{{driver}}");
    info!("   Sector Times:     GET http://{host}:{port}/sectors/{{year}}/{{round}}/{{driver}}");
    info!("   Pace Analysis:    GET http://{host}:{port}/analysis/pace/{{year}}/{{round}}/{{driver}}");
    info!("   Pit Stops:        GET http://{host}:{port}/pitstops/{{year}}/{{round}}");
    info!("   Comparison:       GET http://{host}:{port}/comparison/{{year}}/{{round}}/{{d1}}/{{d2}}");
    info!("   Safety Car:       GET http://{host}:{port}/safety-car/{{year}}/{{round}}");
    info!("   Telemetry:        GET http://{host}:{port}/telemetry/{{year}}/{{round}}/{{d1}}/{{d2}}");
    info!("   Circuit Layout:   GET http://{host}:{port}/circuit-layout/{{year}}/{{round}}");
    info!("=== End of Endpoint List ===");
}
