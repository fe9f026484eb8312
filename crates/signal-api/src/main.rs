//! gridsim-signal-api - synthetic grid-carbon-intensity oracle.
//!
//! Serves the signal endpoints, drives the engine on a fixed tick period,
//! and publishes every snapshot to the artifact path atomically.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use gridsim_engine::config::{self, SignalConfig};
use gridsim_engine::persist::SnapshotPersister;
use gridsim_engine::signal::CarbonSignalEngine;
use gridsim_signal_api::handlers::router;
use gridsim_signal_api::scheduler::spawn_ticker;
use gridsim_signal_api::state::AppState;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "gridsim-signal-api")]
#[command(about = "Synthetic grid-carbon-intensity oracle with a drifting, seeded signal")]
struct Cli {
    /// TCP port to bind
    #[arg(long, env = "CARBON_API_PORT", default_value_t = 18181)]
    port: u16,

    /// Artifact path for the latest snapshot
    #[arg(
        long,
        env = "CARBON_API_OUT_FILE",
        default_value = "carbon-traces/electricitymap-dynamic.json"
    )]
    out_file: PathBuf,

    /// Tick period in seconds (floored at 1)
    #[arg(long, env = "CARBON_API_UPDATE_SECONDS", default_value_t = config::DEFAULT_UPDATE_SECONDS)]
    update_seconds: u64,

    /// Per-tick drift amplitude, gCO2/kWh
    #[arg(long, env = "CARBON_API_JITTER_G", default_value_t = config::DEFAULT_DRIFT_G)]
    drift_g: f64,

    /// Forecast jitter amplitude, gCO2/kWh
    #[arg(long, env = "CARBON_API_FORECAST_JITTER_G", default_value_t = config::DEFAULT_FORECAST_DRIFT_G)]
    forecast_drift_g: f64,

    /// Lower intensity bound, gCO2/kWh
    #[arg(long, env = "CARBON_API_MIN_G", default_value_t = config::DEFAULT_MIN_G)]
    min_g: f64,

    /// Upper intensity bound, gCO2/kWh (floored at min + 1)
    #[arg(long, env = "CARBON_API_MAX_G", default_value_t = config::DEFAULT_MAX_G)]
    max_g: f64,

    /// Baseline intensities as z1:v1,z2:v2 pairs
    #[arg(long, env = "CARBON_API_BASE_ZONES", default_value = config::DEFAULT_BASE_ZONES)]
    base_zones: String,

    /// Seed for the signal's random stream
    #[arg(long, env = "CARBON_API_SEED", default_value_t = config::DEFAULT_SEED)]
    seed: u32,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridsim_signal_api=info,gridsim_engine=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = SignalConfig {
        seed: cli.seed,
        drift_g: cli.drift_g,
        forecast_drift_g: cli.forecast_drift_g,
        min_g: cli.min_g,
        max_g: cli.max_g,
        base_zones: config::parse_base_zones(&cli.base_zones),
    }
    .clamped();
    let update_seconds = cli.update_seconds.max(1);

    let mut engine = match CarbonSignalEngine::new(config) {
        Ok(engine) => engine,
        Err(err) => {
            error!("failed to build signal engine: {err}");
            std::process::exit(1);
        }
    };

    let persister = SnapshotPersister::new(&cli.out_file);
    // First snapshot up front so /latest and the artifact are immediately
    // populated.
    let snapshot = engine.reset();
    if let Err(err) = persister.publish(&snapshot) {
        error!("failed to publish initial snapshot: {err}");
    }

    let state = AppState::new(engine, persister, update_seconds);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ticker = spawn_ticker(state.clone(), shutdown_rx);

    let app = router(state.clone()).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };

    info!(
        "carbon signal API listening on {addr}, writing {} every {update_seconds}s",
        state.out_file().display()
    );

    let serve = axum::serve(listener, app).with_graceful_shutdown(async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to listen for shutdown signal: {err}");
        }
    });

    if let Err(err) = serve.await {
        error!("server error: {err}");
    }

    // Stop the tick loop before exiting so the artifact handle is released
    // cleanly.
    let _ = shutdown_tx.send(true);
    let _ = ticker.await;
    info!("shutdown complete");
}
