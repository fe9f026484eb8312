//! Seeded random stream
//!
//! mulberry32 over a 32-bit accumulator. The exact bit-level sequence is
//! part of the reproducibility contract: every simulated outcome must be
//! recomputable from `(seed, number of prior draws)`, so the algorithm is
//! fixed here rather than delegated to an external generator.

/// Deterministic pseudo-random stream in `[0, 1)`.
///
/// Not `Sync`: all draws for one stream must be issued from a single
/// logical sequence. Owners that share a stream across tasks must wrap it
/// in a mutex.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Reinitialize to the zero-draw state for `seed`.
    pub fn reset(&mut self, seed: u32) {
        self.state = seed;
    }

    /// Next value in `[0, 1)`. Advances the stream by exactly one draw.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let t = self.state;
        let mut x = (t ^ (t >> 15)).wrapping_mul(t | 1);
        x ^= x.wrapping_add((x ^ (x >> 7)).wrapping_mul(x | 61));
        f64::from(x ^ (x >> 14)) / 4_294_967_296.0
    }

    /// Uniform draw in `[-amplitude, amplitude)`. One draw.
    pub fn signed_uniform(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }

    /// Uniform integer in `[0, bound]` inclusive. One draw.
    pub fn uniform_int(&mut self, bound: u64) -> u64 {
        (self.next_f64() * (bound + 1) as f64) as u64
    }
}
