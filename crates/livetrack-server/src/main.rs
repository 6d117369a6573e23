//! LiveTrack Registry Server
//!
//! Lightweight Axum server that:
//! - Accepts position reports via `POST /track-location`
//! - Serves the active-tracker listing via `GET /track-location`
//! - Runs the background eviction sweep that purges stale trackers
//!
//! The registry is purely in-memory and resets on restart.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::info;

use livetrack_registry::api::{create_router, AppState};
use livetrack_registry::{sweep, LocationRegistry, RegistryConfig};

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "livetrack-server", about = "LiveTrack location registry server")]
struct Args {
    /// HTTP port for the registry API
    #[arg(long, default_value = "8080")]
    http_port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Seconds a stopped tracker is kept for late reads before eviction
    #[arg(long, default_value = "180")]
    inactivity_timeout: u64,

    /// Multiplier on the inactivity timeout for trackers that went silent
    /// without stopping
    #[arg(long, default_value = "5")]
    abandoned_multiplier: u32,

    /// Eviction sweep cadence in seconds
    #[arg(long, default_value = "10")]
    sweep_interval: u64,
}

// ── Main ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    let config = RegistryConfig::builder()
        .inactivity_timeout(Duration::from_secs(args.inactivity_timeout))
        .abandoned_multiplier(args.abandoned_multiplier)
        .sweep_interval(Duration::from_secs(args.sweep_interval))
        .build();

    info!("LiveTrack Registry Server (Rust + Axum)");
    info!("  HTTP:        http://{}:{}", args.bind, args.http_port);
    info!("  Stop grace:  {}s", config.inactivity_timeout.as_secs());
    info!("  Silent cap:  {}s", config.abandoned_timeout().as_secs());
    info!("  Sweep every: {}s", config.sweep_interval.as_secs());

    let registry = LocationRegistry::new(config);
    let sweeper = sweep::spawn(registry.clone());

    let app = create_router(AppState::new(registry)).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from((args.bind, args.http_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind HTTP port");
    info!("Registry listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("Shutdown signal received");
        })
        .await
        .expect("HTTP server failed");

    // In-flight requests have drained; stop the sweep timer before exit.
    sweeper.shutdown().await;
    info!("Server shut down cleanly");
}
