//! Synthetic zone backend
//!
//! Per-request decision engine: computes a simulated latency and a
//! success/failure outcome from an immutable [`ZoneProfile`] and a seeded
//! random stream. The only state mutated across requests is the stream's
//! draw counter.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{Error, Result};
use crate::rng::SeededRng;
use crate::types::ZoneId;

/// Path that forces a failure outcome without consuming a draw.
pub const FORCED_FAILURE_PATH: &str = "/unstable";
/// Liveness path, bypasses simulation entirely.
pub const HEALTH_PATH: &str = "/health";
/// Energy-model descriptor path, bypasses simulation entirely.
pub const ENERGY_MODEL_PATH: &str = "/energy-model";
/// Stable error code for injected backend failures.
pub const SIMULATED_FAILURE: &str = "simulated-backend-failure";

/// Immutable per-zone performance/failure/energy profile.
///
/// Constructed once at process start; never mutated.
#[derive(Debug, Clone)]
pub struct ZoneProfile {
    pub zone: ZoneId,
    pub region: String,
    pub base_delay_ms: u64,
    pub jitter_ms: u64,
    pub error_rate: f64,
    pub energy_per_request_j: f64,
}

impl ZoneProfile {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.error_rate) {
            return Err(Error::InvalidErrorRate(self.error_rate));
        }
        Ok(())
    }

    /// Provenance tag reported by the energy-model descriptor.
    pub fn energy_source(&self) -> String {
        format!("{}-sim-energy-v1", self.zone)
    }
}

/// Inbound request descriptor.
#[derive(Debug, Clone)]
pub struct SimulatedRequest {
    pub method: String,
    pub path: String,
    pub query: IndexMap<String, String>,
}

impl SimulatedRequest {
    pub fn get(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: IndexMap::new(),
        }
    }
}

/// Outcome of one simulated request. Created and consumed within a single
/// request's lifetime; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulatedResponse {
    /// Liveness check: always succeeds, zero simulated delay.
    Liveness,
    /// Energy-model descriptor: always succeeds, zero simulated delay.
    EnergyModel {
        energy_joules_override: f64,
        energy_source: String,
    },
    /// Successful simulated backend call.
    Success {
        delay_ms: u64,
        energy_joules_hint: f64,
    },
    /// Injected backend failure; still incurs the simulated delay.
    Failure { delay_ms: u64 },
}

impl SimulatedResponse {
    /// Simulated delay the caller should incur before responding.
    pub fn delay_ms(&self) -> u64 {
        match self {
            SimulatedResponse::Liveness | SimulatedResponse::EnergyModel { .. } => 0,
            SimulatedResponse::Success { delay_ms, .. }
            | SimulatedResponse::Failure { delay_ms } => *delay_ms,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SimulatedResponse::Failure { .. })
    }
}

/// Per-request decision engine for one synthetic zone.
pub struct ZoneSimulator {
    profile: ZoneProfile,
    rng: SeededRng,
}

impl ZoneSimulator {
    pub fn new(profile: ZoneProfile, rng: SeededRng) -> Result<Self> {
        profile.validate()?;
        Ok(Self { profile, rng })
    }

    pub fn profile(&self) -> &ZoneProfile {
        &self.profile
    }

    /// Decide the outcome of one request.
    ///
    /// Reserved introspection paths bypass simulation and consume no
    /// draws. For everything else the jitter draw happens first (only when
    /// `jitter_ms > 0`), then the outcome: the forced-failure path is
    /// checked before the probability draw and consumes none itself.
    pub fn handle(&mut self, req: &SimulatedRequest) -> SimulatedResponse {
        match req.path.as_str() {
            HEALTH_PATH => return SimulatedResponse::Liveness,
            ENERGY_MODEL_PATH => {
                return SimulatedResponse::EnergyModel {
                    energy_joules_override: self.profile.energy_per_request_j,
                    energy_source: self.profile.energy_source(),
                };
            }
            _ => {}
        }

        let jitter = if self.profile.jitter_ms > 0 {
            self.rng.uniform_int(self.profile.jitter_ms)
        } else {
            0
        };
        let delay_ms = self.profile.base_delay_ms + jitter;

        let failed = if req.path == FORCED_FAILURE_PATH {
            true
        } else {
            self.rng.next_f64() < self.profile.error_rate
        };

        trace!(
            zone = %self.profile.zone,
            path = %req.path,
            delay_ms,
            failed,
            "request simulated"
        );

        if failed {
            SimulatedResponse::Failure { delay_ms }
        } else {
            SimulatedResponse::Success {
                delay_ms,
                energy_joules_hint: self.profile.energy_per_request_j,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(error_rate: f64, jitter_ms: u64) -> ZoneProfile {
        ZoneProfile {
            zone: ZoneId::from("us-east"),
            region: "us-east".to_string(),
            base_delay_ms: 18,
            jitter_ms,
            error_rate,
            energy_per_request_j: 7.2,
        }
    }

    fn simulator(error_rate: f64, jitter_ms: u64) -> ZoneSimulator {
        ZoneSimulator::new(profile(error_rate, jitter_ms), SeededRng::new(42))
            .expect("profile should validate")
    }

    #[test]
    fn test_rejects_error_rate_out_of_range() {
        assert!(ZoneSimulator::new(profile(1.5, 0), SeededRng::new(1)).is_err());
        assert!(ZoneSimulator::new(profile(-0.1, 0), SeededRng::new(1)).is_err());
    }

    #[test]
    fn test_delay_within_jitter_bounds() {
        let mut sim = simulator(0.0, 8);
        for _ in 0..10_000 {
            let resp = sim.handle(&SimulatedRequest::get("GET", "/api/work"));
            let delay = resp.delay_ms();
            assert!((18..=26).contains(&delay), "delay out of range: {delay}");
        }
    }

    #[test]
    fn test_zero_jitter_consumes_no_jitter_draw() {
        // With jitter disabled, both simulators must issue the same outcome
        // draws even though one has a different jitter bound configured.
        let mut flat = simulator(0.5, 0);
        let mut reference = SeededRng::new(42);
        for _ in 0..100 {
            let resp = flat.handle(&SimulatedRequest::get("GET", "/work"));
            let expected_fail = reference.next_f64() < 0.5;
            assert_eq!(resp.is_failure(), expected_fail);
            assert_eq!(resp.delay_ms(), 18);
        }
    }

    #[test]
    fn test_forced_failure_consumes_no_draw() {
        let mut sim = simulator(0.0, 0);
        let forced = sim.handle(&SimulatedRequest::get("GET", FORCED_FAILURE_PATH));
        assert!(forced.is_failure());

        // The stream must be in the same state as a fresh one, so the next
        // probabilistic outcome matches the first draw of seed 42.
        let mut reference = SeededRng::new(42);
        let first_draw = reference.next_f64();
        let mut threshold_sim = simulator(first_draw + 1e-9, 0);
        threshold_sim.handle(&SimulatedRequest::get("GET", FORCED_FAILURE_PATH));
        let next = threshold_sim.handle(&SimulatedRequest::get("GET", "/work"));
        assert!(next.is_failure(), "first draw should sit below threshold");
    }

    #[test]
    fn test_forced_failure_incurs_delay() {
        let mut sim = simulator(0.0, 0);
        let resp = sim.handle(&SimulatedRequest::get("POST", FORCED_FAILURE_PATH));
        assert_eq!(resp, SimulatedResponse::Failure { delay_ms: 18 });
    }

    #[test]
    fn test_health_bypasses_simulation() {
        let mut sim = simulator(1.0, 8);
        let resp = sim.handle(&SimulatedRequest::get("GET", HEALTH_PATH));
        assert_eq!(resp, SimulatedResponse::Liveness);
        assert_eq!(resp.delay_ms(), 0);
    }

    #[test]
    fn test_energy_model_descriptor_shape() {
        let mut sim = simulator(1.0, 8);
        let resp = sim.handle(&SimulatedRequest::get("GET", ENERGY_MODEL_PATH));
        assert_eq!(
            resp,
            SimulatedResponse::EnergyModel {
                energy_joules_override: 7.2,
                energy_source: "us-east-sim-energy-v1".to_string(),
            }
        );
    }

    #[test]
    fn test_failure_rate_statistics() {
        let mut sim = simulator(0.01, 0);
        let total = 100_000;
        let failures = (0..total)
            .filter(|_| sim.handle(&SimulatedRequest::get("GET", "/work")).is_failure())
            .count();
        let rate = failures as f64 / total as f64;
        assert!(
            (rate - 0.01).abs() < 0.003,
            "observed failure rate {rate} too far from 0.01"
        );
    }

    #[test]
    fn test_error_rate_one_always_fails() {
        let mut sim = simulator(1.0, 0);
        for _ in 0..100 {
            assert!(sim.handle(&SimulatedRequest::get("GET", "/work")).is_failure());
        }
    }
}
