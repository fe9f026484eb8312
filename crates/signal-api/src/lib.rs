//! HTTP access layer and tick scheduler for the carbon signal engine.
//!
//! Pure translation between transport requests and engine calls; all
//! simulation logic lives in `gridsim-engine`.

pub mod handlers;
pub mod scheduler;
pub mod state;
