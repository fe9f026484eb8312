//! Endpoint contract tests for the zone backend.

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use gridsim_engine::rng::SeededRng;
use gridsim_engine::types::ZoneId;
use gridsim_engine::zone::{ZoneProfile, ZoneSimulator};
use gridsim_zone_sim::app::{router, ZoneState};
use serde_json::Value;
use tower::ServiceExt;

fn state(error_rate: f64) -> ZoneState {
    let profile = ZoneProfile {
        zone: ZoneId::from("us-east"),
        region: "us-east".to_string(),
        base_delay_ms: 0,
        jitter_ms: 0,
        error_rate,
        energy_per_request_j: 7.2,
    };
    let simulator =
        ZoneSimulator::new(profile, SeededRng::new(42)).expect("profile should validate");
    ZoneState::new(simulator)
}

async fn get(state: ZoneState, uri: &str) -> (StatusCode, Value, Option<String>) {
    let resp = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let zone_header = resp
        .headers()
        .get("x-zone")
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap(), zone_header)
}

#[tokio::test]
async fn test_health_always_succeeds() {
    // Even a zone that fails every simulated request stays live.
    let (status, body, zone) = get(state(1.0), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["zone"], "us-east");
    assert_eq!(body["region"], "us-east");
    assert_eq!(zone.as_deref(), Some("us-east"));
}

#[tokio::test]
async fn test_energy_model_descriptor() {
    let (status, body, _) = get(state(1.0), "/energy-model").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["zone"], "us-east");
    assert_eq!(body["energy_joules_override"], 7.2);
    assert_eq!(body["energy_source"], "us-east-sim-energy-v1");
}

#[tokio::test]
async fn test_forced_failure_path_returns_503() {
    let (status, body, _) = get(state(0.0), "/unstable").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "simulated-backend-failure");
}

#[tokio::test]
async fn test_probabilistic_failure_returns_503() {
    let (status, body, _) = get(state(1.0), "/api/checkout").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "simulated-backend-failure");
}

#[tokio::test]
async fn test_default_path_echoes_request_metadata() {
    let (status, body, _) = get(state(0.0), "/api/checkout?item=1&qty=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["method"], "GET");
    assert_eq!(body["path"], "/api/checkout");
    assert_eq!(body["query"]["item"], "1");
    assert_eq!(body["query"]["qty"], "3");
    assert_eq!(body["simulated_delay_ms"], 0);
    assert_eq!(body["energy_joules_hint"], 7.2);
    assert!(body["timestamp_utc"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_request_headers_are_echoed() {
    let resp = router(state(0.0))
        .oneshot(
            Request::builder()
                .uri("/api/work")
                .header("x-experiment", "baseline")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["headers"]["x-experiment"], "baseline");
}
