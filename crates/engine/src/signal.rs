//! Carbon signal engine
//!
//! Tick-driven generator of per-zone carbon-intensity values and
//! forecasts. Ticks are strictly serialized by `&mut self`; readers only
//! ever observe immutable, reference-counted snapshots, so a concurrent
//! `latest()` sees either the fully-old or fully-new state.
//!
//! Determinism contract: for a fixed `(seed, zone set, baselines, drift
//! parameters)` the snapshot sequence produced by N ticks after a reset is
//! bit-for-bit reproducible. Zones evolve in declaration order and each
//! zone consumes exactly two draws per tick (drift, then forecast jitter).

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SignalConfig;
use crate::error::{Error, Result};
use crate::rng::SeededRng;
use crate::types::ZoneId;

/// Scenario tag stamped into every snapshot's provenance block.
pub const SCENARIO: &str = "dynamic-local-carbon-signal";
/// Source tag stamped into every snapshot's provenance block.
pub const SOURCE: &str = "carbon-signal-api";

/// Provenance block of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestNotes {
    pub scenario: String,
    pub source: String,
    pub tick: u64,
    pub generated_at_utc: String,
    pub seed: u32,
}

/// Intensity and forecast for one zone at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneReading {
    pub carbon_intensity: f64,
    pub carbon_intensity_forecast: f64,
}

/// Immutable point-in-time record of all zones. Produced once per tick;
/// superseded, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "testNotes")]
    pub test_notes: TestNotes,
    pub zones: IndexMap<ZoneId, ZoneReading>,
}

impl Snapshot {
    pub fn tick(&self) -> u64 {
        self.test_notes.tick
    }

    pub fn zone(&self, zone: &ZoneId) -> Option<&ZoneReading> {
        self.zones.get(zone)
    }
}

/// Stateful, tick-driven per-zone signal generator.
pub struct CarbonSignalEngine {
    config: SignalConfig,
    /// Current intensity per zone, full precision (snapshots are rounded)
    state: IndexMap<ZoneId, f64>,
    rng: SeededRng,
    tick: u64,
    latest: Option<Arc<Snapshot>>,
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

impl CarbonSignalEngine {
    /// Build an engine in the zero-tick state. No snapshot exists until
    /// the first `tick()` or `reset()`.
    pub fn new(config: SignalConfig) -> Result<Self> {
        if config.min_g >= config.max_g {
            return Err(Error::InvalidBounds {
                min: config.min_g,
                max: config.max_g,
            });
        }
        if config.base_zones.is_empty() {
            return Err(Error::NoZones);
        }
        let state = config.base_zones.clone();
        let rng = SeededRng::new(config.seed);
        info!(
            seed = config.seed,
            zones = state.len(),
            "carbon signal engine created"
        );
        Ok(Self {
            config,
            state,
            rng,
            tick: 0,
            latest: None,
        })
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Current tick counter (0 before any production).
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Most recently produced snapshot, if any.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.latest.clone()
    }

    /// Advance the engine by one tick and produce a snapshot.
    pub fn tick(&mut self) -> Arc<Snapshot> {
        self.tick_with_timestamp(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Tick with an explicit `generatedAtUtc` value. Pure state transition
    /// apart from the stored snapshot; drives all determinism tests.
    pub fn tick_with_timestamp(&mut self, generated_at_utc: impl Into<String>) -> Arc<Snapshot> {
        self.tick += 1;
        let tick = self.tick;
        let mut zones = IndexMap::with_capacity(self.state.len());

        for (zone, current) in self.state.iter_mut() {
            let drift = self.rng.signed_uniform(self.config.drift_g);
            let trend = ((tick as f64) / 8.0 + zone.name_len() as f64).sin()
                * (self.config.drift_g * 0.35);
            let next = (*current + drift + trend).clamp(self.config.min_g, self.config.max_g);
            *current = next;

            let forecast = (next + self.rng.signed_uniform(self.config.forecast_drift_g)
                - ((tick as f64) / 10.0).sin() * 8.0)
                .clamp(self.config.min_g, self.config.max_g);

            zones.insert(
                zone.clone(),
                ZoneReading {
                    carbon_intensity: round3(next),
                    carbon_intensity_forecast: round3(forecast),
                },
            );
        }

        let snapshot = Arc::new(Snapshot {
            test_notes: TestNotes {
                scenario: SCENARIO.to_string(),
                source: SOURCE.to_string(),
                tick,
                generated_at_utc: generated_at_utc.into(),
                seed: self.config.seed,
            },
            zones,
        });
        debug!(tick, "snapshot produced");
        self.latest = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Restore every zone to its configured baseline, reseed the random
    /// stream, zero the tick counter, then produce one snapshot so a
    /// current snapshot is always available afterwards.
    pub fn reset(&mut self) -> Arc<Snapshot> {
        self.state = self.config.base_zones.clone();
        self.rng.reset(self.config.seed);
        self.tick = 0;
        info!(seed = self.config.seed, "engine reset");
        self.tick()
    }

    /// `reset()` with an explicit timestamp for the produced snapshot.
    pub fn reset_with_timestamp(&mut self, generated_at_utc: impl Into<String>) -> Arc<Snapshot> {
        self.state = self.config.base_zones.clone();
        self.rng.reset(self.config.seed);
        self.tick = 0;
        info!(seed = self.config.seed, "engine reset");
        self.tick_with_timestamp(generated_at_utc)
    }
}
