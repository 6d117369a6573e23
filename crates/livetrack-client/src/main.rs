//! LiveTrack client CLI.
//!
//! Two modes, matching the two sides of the registry's contract:
//! - `track`: run a reporting agent over a simulated route
//! - `watch`: run the observer loop and log the active set each refresh

use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{error, info, warn};

use livetrack_client::{
    Observer, ObserverConfig, RegistryClient, ReportingAgent, SimulatedRoute,
};

#[derive(Parser, Debug)]
#[command(name = "livetrack-client", about = "LiveTrack reporting agent and observer")]
struct Args {
    /// Registry base URL
    #[arg(long, default_value = "http://localhost:8080")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Continuously report a simulated route under a tracking identifier
    Track {
        /// Tracking identifier to report under
        #[arg(long)]
        tracker_id: String,

        /// Seconds between position fixes
        #[arg(long, default_value = "2")]
        fix_interval: u64,

        /// Route center latitude
        #[arg(long, default_value = "52.2297")]
        latitude: f64,

        /// Route center longitude
        #[arg(long, default_value = "21.0122")]
        longitude: f64,
    },
    /// Poll the active-tracker listing and log each refresh
    Watch {
        /// Seconds between polls
        #[arg(long, default_value = "3")]
        poll_interval: u64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let client = RegistryClient::new(&args.server).expect("Failed to build HTTP client");

    // Ctrl-C flips the shutdown flag for whichever loop is running.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    match args.command {
        Command::Track {
            tracker_id,
            fix_interval,
            latitude,
            longitude,
        } => {
            info!(%tracker_id, server = %args.server, "Starting reporting agent");
            let source =
                SimulatedRoute::new(latitude, longitude, Duration::from_secs(fix_interval));
            let mut agent = ReportingAgent::new(client, tracker_id, source);

            if let Err(err) = agent.run(shutdown_rx).await {
                error!(error = %err, "Tracking session ended with a positioning failure");
                std::process::exit(1);
            }
        }
        Command::Watch { poll_interval } => {
            info!(server = %args.server, "Starting observer loop");
            let config = ObserverConfig {
                poll_interval: Duration::from_secs(poll_interval),
            };
            let observer = Observer::new(client, config);
            let handle = observer.handle();

            let observer_shutdown = shutdown_rx.clone();
            let observer_task =
                tokio::spawn(async move { observer.run(observer_shutdown).await });

            let mut ticker = tokio::time::interval(Duration::from_secs(poll_interval));
            let mut shutdown = shutdown_rx;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Some(message) = handle.last_error() {
                            warn!(%message, "Last poll failed; showing previous snapshot");
                        }
                        let trackers = handle.active_trackers();
                        if trackers.is_empty() {
                            info!("No active trackers");
                        }
                        for tracker in trackers {
                            info!(
                                tracker_id = %tracker.tracker_id,
                                latitude = tracker.latitude,
                                longitude = tracker.longitude,
                                last_updated_at = %tracker.last_updated_at,
                                "Active tracker"
                            );
                        }
                    }
                    _ = shutdown.changed() => break,
                }
            }

            let _ = observer_task.await;
        }
    }

    info!("Client stopped");
}
