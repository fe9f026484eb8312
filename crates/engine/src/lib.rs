//! GridSim engine
//!
//! Deterministic simulation primitives for the carbon-aware routing test
//! harness: seeded randomness, synthetic zone backends, the tick-driven
//! carbon-signal generator, and atomic snapshot publishing.

pub mod config;
pub mod error;
pub mod persist;
pub mod rng;
pub mod signal;
pub mod types;
pub mod zone;

pub use error::{Error, Result};
