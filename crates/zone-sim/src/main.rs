//! gridsim-zone-sim - one synthetic backend zone.
//!
//! Emulates a real service's latency, failure rate, and energy draw from
//! an immutable profile supplied at startup.

use std::net::SocketAddr;

use clap::Parser;
use gridsim_engine::rng::SeededRng;
use gridsim_engine::zone::{ZoneProfile, ZoneSimulator};
use gridsim_zone_sim::app::{router, ZoneState};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "gridsim-zone-sim")]
#[command(about = "Synthetic backend zone with simulated latency, failures and energy draw")]
struct Cli {
    /// Zone name
    #[arg(long, env = "ZONE_NAME", default_value = "zone-generic")]
    zone: String,

    /// Region label (defaults to the zone name)
    #[arg(long, env = "ZONE_REGION")]
    region: Option<String>,

    /// TCP port to bind
    #[arg(long, env = "PORT", default_value_t = 5601)]
    port: u16,

    /// Base simulated delay per request, milliseconds
    #[arg(long, env = "BASE_DELAY_MS", default_value_t = 25)]
    base_delay_ms: u64,

    /// Upper bound of the uniform delay jitter, milliseconds
    #[arg(long, env = "JITTER_MS", default_value_t = 8)]
    jitter_ms: u64,

    /// Probability of an injected failure per request, 0.0..=1.0
    #[arg(long, env = "ERROR_RATE", default_value_t = 0.01)]
    error_rate: f64,

    /// Energy drawn per request, joules
    #[arg(long, env = "ENERGY_PER_REQUEST_J", default_value_t = 7.2)]
    energy_per_request_j: f64,

    /// Seed for the zone's random stream
    #[arg(long, env = "ZONE_SEED", default_value_t = 42)]
    seed: u32,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridsim_zone_sim=info,gridsim_engine=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let profile = ZoneProfile {
        zone: cli.zone.as_str().into(),
        region: cli.region.unwrap_or_else(|| cli.zone.clone()),
        base_delay_ms: cli.base_delay_ms,
        jitter_ms: cli.jitter_ms,
        error_rate: cli.error_rate,
        energy_per_request_j: cli.energy_per_request_j,
    };

    let simulator = match ZoneSimulator::new(profile, SeededRng::new(cli.seed)) {
        Ok(simulator) => simulator,
        Err(err) => {
            error!("invalid zone profile: {err}");
            std::process::exit(1);
        }
    };

    let state = ZoneState::new(simulator);
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
        event = "zone_server_started",
        zone = %state.zone,
        region = %state.region,
        port = cli.port,
        base_delay_ms = cli.base_delay_ms,
        jitter_ms = cli.jitter_ms,
        error_rate = cli.error_rate,
        energy_per_request_j = cli.energy_per_request_j,
        "zone backend ready"
    );

    if let Err(err) = axum::serve(listener, app).await {
        error!("server error: {err}");
    }
}
