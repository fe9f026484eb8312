//! Signal engine configuration
//!
//! Defaults mirror the documented oracle defaults; every value is
//! overridable from the access layer's CLI. Malformed baseline lists are a
//! recoverable configuration error: bad items are skipped with a warning
//! and an empty result falls back to the built-in zone set.

use indexmap::IndexMap;
use tracing::warn;

use crate::types::ZoneId;

pub const DEFAULT_SEED: u32 = 42;
pub const DEFAULT_UPDATE_SECONDS: u64 = 15;
pub const DEFAULT_DRIFT_G: f64 = 40.0;
pub const DEFAULT_FORECAST_DRIFT_G: f64 = 30.0;
pub const DEFAULT_MIN_G: f64 = 50.0;
pub const DEFAULT_MAX_G: f64 = 900.0;
pub const DEFAULT_BASE_ZONES: &str = "us-east:430,us-west:300";

/// Configuration for one [`CarbonSignalEngine`](crate::signal::CarbonSignalEngine).
#[derive(Debug, Clone)]
pub struct SignalConfig {
    /// Seed for the engine's random stream
    pub seed: u32,
    /// Amplitude of the per-tick random drift, gCO2/kWh
    pub drift_g: f64,
    /// Amplitude of the forecast jitter, gCO2/kWh
    pub forecast_drift_g: f64,
    /// Lower intensity bound, gCO2/kWh
    pub min_g: f64,
    /// Upper intensity bound, gCO2/kWh
    pub max_g: f64,
    /// Baseline intensity per zone, in declaration order
    pub base_zones: IndexMap<ZoneId, f64>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            drift_g: DEFAULT_DRIFT_G,
            forecast_drift_g: DEFAULT_FORECAST_DRIFT_G,
            min_g: DEFAULT_MIN_G,
            max_g: DEFAULT_MAX_G,
            base_zones: parse_base_zones(DEFAULT_BASE_ZONES),
        }
    }
}

impl SignalConfig {
    /// Apply the documented floors: non-negative amplitudes and bounds,
    /// `max_g` at least one unit above `min_g`.
    pub fn clamped(mut self) -> Self {
        self.drift_g = self.drift_g.max(0.0);
        self.forecast_drift_g = self.forecast_drift_g.max(0.0);
        self.min_g = self.min_g.max(0.0);
        self.max_g = self.max_g.max(self.min_g + 1.0);
        self
    }
}

/// Built-in zone set used when no baseline parses validly.
pub fn default_base_zones() -> IndexMap<ZoneId, f64> {
    let mut zones = IndexMap::new();
    zones.insert(ZoneId::from("us-east"), 430.0);
    zones.insert(ZoneId::from("us-west"), 300.0);
    zones
}

/// Parse a `zone:value,zone:value` baseline list.
///
/// Items that are blank, missing a `:`, or carry a non-finite value are
/// skipped with a warning. A repeated zone keeps the last value. If nothing
/// parses, the built-in default set is returned; this is never fatal.
pub fn parse_base_zones(raw: &str) -> IndexMap<ZoneId, f64> {
    let mut zones = IndexMap::new();
    for part in raw.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        let Some((name, value)) = item.split_once(':') else {
            warn!(item, "skipping baseline item without ':'");
            continue;
        };
        let zone = name.trim();
        let base = match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                warn!(item, "skipping baseline item with unparseable value");
                continue;
            }
        };
        if zone.is_empty() {
            warn!(item, "skipping baseline item with empty zone name");
            continue;
        }
        zones.insert(ZoneId::from(zone), base);
    }
    if zones.is_empty() {
        warn!(raw, "no valid baselines parsed, using built-in zone set");
        return default_base_zones();
    }
    zones
}
