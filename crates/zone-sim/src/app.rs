//! Request handling for the synthetic zone backend.
//!
//! Every path funnels through the zone simulator; the handler only
//! translates HTTP to a request descriptor, sleeps the simulated delay,
//! and shapes the JSON response. The simulator mutex keeps all draws of
//! the zone's random stream in one sequence.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use gridsim_engine::zone::{SimulatedRequest, SimulatedResponse, ZoneSimulator, SIMULATED_FAILURE};
use indexmap::IndexMap;
use serde_json::json;
use tokio::sync::Mutex;

/// Shared state for the zone server.
#[derive(Clone)]
pub struct ZoneState {
    pub simulator: Arc<Mutex<ZoneSimulator>>,
    pub zone: String,
    pub region: String,
}

impl ZoneState {
    pub fn new(simulator: ZoneSimulator) -> Self {
        let profile = simulator.profile();
        let zone = profile.zone.to_string();
        let region = profile.region.clone();
        Self {
            simulator: Arc::new(Mutex::new(simulator)),
            zone,
            region,
        }
    }
}

/// Build the zone backend router. A single fallback handler serves every
/// path; routing decisions belong to the simulator.
pub fn router(state: ZoneState) -> Router {
    Router::new().fallback(handle_any).with_state(state)
}

async fn handle_any(
    State(state): State<ZoneState>,
    method: Method,
    uri: Uri,
    Query(query): Query<IndexMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let start = Instant::now();
    let request = SimulatedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
    };

    let outcome = state.simulator.lock().await.handle(&request);

    let delay_ms = outcome.delay_ms();
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    let zone_headers = [
        ("x-zone", state.zone.clone()),
        ("x-region", state.region.clone()),
    ];

    match outcome {
        SimulatedResponse::Liveness => (
            StatusCode::OK,
            zone_headers,
            Json(json!({ "ok": true, "zone": state.zone, "region": state.region })),
        ),
        SimulatedResponse::EnergyModel {
            energy_joules_override,
            energy_source,
        } => (
            StatusCode::OK,
            zone_headers,
            Json(json!({
                "zone": state.zone,
                "region": state.region,
                "energy_joules_override": energy_joules_override,
                "energy_source": energy_source,
            })),
        ),
        SimulatedResponse::Failure { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            zone_headers,
            Json(json!({
                "ok": false,
                "zone": state.zone,
                "region": state.region,
                "error": SIMULATED_FAILURE,
            })),
        ),
        SimulatedResponse::Success {
            delay_ms,
            energy_joules_hint,
        } => {
            let echoed_headers: IndexMap<String, String> = headers
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            (
                StatusCode::OK,
                zone_headers,
                Json(json!({
                    "ok": true,
                    "zone": state.zone,
                    "region": state.region,
                    "method": request.method,
                    "path": request.path,
                    "query": request.query,
                    "simulated_delay_ms": delay_ms,
                    "observed_handler_ms": start.elapsed().as_millis() as u64,
                    "energy_joules_hint": energy_joules_hint,
                    "timestamp_utc": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                    "headers": echoed_headers,
                })),
            )
        }
    }
}
