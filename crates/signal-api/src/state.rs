//! Shared application state and response types for the signal API.

use std::path::PathBuf;
use std::sync::Arc;

use gridsim_engine::persist::SnapshotPersister;
use gridsim_engine::signal::CarbonSignalEngine;
use serde::Serialize;
use tokio::sync::Mutex;

/// Shared state for the signal API server.
///
/// The engine mutex serializes ticks and resets against each other;
/// readers never hold it across a response because `latest()` hands out an
/// `Arc<Snapshot>` clone.
pub struct AppState {
    pub engine: Arc<Mutex<CarbonSignalEngine>>,
    pub persister: Arc<SnapshotPersister>,
    pub update_seconds: u64,
}

/// Clones `AppState` by cloning `Arc` pointers, not the underlying data.
impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            persister: Arc::clone(&self.persister),
            update_seconds: self.update_seconds,
        }
    }
}

impl AppState {
    pub fn new(engine: CarbonSignalEngine, persister: SnapshotPersister, update_seconds: u64) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            persister: Arc::new(persister),
            update_seconds,
        }
    }

    pub fn out_file(&self) -> PathBuf {
        self.persister.path().to_path_buf()
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub out_file: PathBuf,
    pub update_seconds: u64,
}

/// Body of `GET /v3/carbon-intensity/latest`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointLookupResponse {
    pub zone: String,
    pub carbon_intensity: f64,
    pub carbon_intensity_forecast: f64,
    pub datetime: String,
}

/// Body of `POST /reset`.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub ok: bool,
    pub reset: bool,
    pub tick: u64,
}
