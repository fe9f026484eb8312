//! REST handlers for the carbon signal endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::state::{AppState, HealthResponse, PointLookupResponse, ResetResponse};

/// Build the signal API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/latest", get(latest_handler))
        .route("/v3/carbon-intensity/latest", get(point_lookup_handler))
        .route("/reset", get(reset_handler).post(reset_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

/// GET `/health` - liveness plus the artifact location and tick period.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        out_file: state.out_file(),
        update_seconds: state.update_seconds,
    })
}

/// GET `/latest` - the full current snapshot, or `{}` before the first tick.
async fn latest_handler(State(state): State<AppState>) -> impl IntoResponse {
    let latest = state.engine.lock().await.latest();
    match latest {
        Some(snapshot) => Json(json!(&*snapshot)),
        None => Json(json!({})),
    }
}

#[derive(Debug, Deserialize)]
struct LookupQuery {
    zone: Option<String>,
}

/// GET `/v3/carbon-intensity/latest?zone=Z` - point lookup by zone id.
///
/// 400 `zone_required` when the parameter is missing or blank, 404
/// `zone_not_found` when the current snapshot does not know the zone.
async fn point_lookup_handler(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> impl IntoResponse {
    let zone = query.zone.as_deref().unwrap_or("").trim().to_string();
    if zone.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "zone_required" })),
        );
    }

    let latest = state.engine.lock().await.latest();
    let reading = latest
        .as_ref()
        .and_then(|snapshot| snapshot.zone(&zone.as_str().into()).copied());
    match reading {
        Some(reading) => (
            StatusCode::OK,
            Json(
                json!(PointLookupResponse {
                    zone,
                    carbon_intensity: reading.carbon_intensity,
                    carbon_intensity_forecast: reading.carbon_intensity_forecast,
                    datetime: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                }),
            ),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "zone_not_found", "zone": zone })),
        ),
    }
}

/// GET/POST `/reset` - restore baselines, reseed, and produce a fresh
/// snapshot. Responds with the tick counter after the reset tick.
async fn reset_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut engine = state.engine.lock().await;
    let snapshot = engine.reset();
    let tick = engine.current_tick();
    drop(engine);

    info!(tick, "engine reset via API");
    if let Err(err) = state.persister.publish(&snapshot) {
        // The engine keeps running; the next scheduled tick retries.
        error!("failed to publish reset snapshot: {err}");
    }

    Json(ResetResponse {
        ok: true,
        reset: true,
        tick,
    })
}

/// Any other path.
async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not_found" })),
    )
}
