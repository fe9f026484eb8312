//! Periodic tick scheduler.
//!
//! Drives the engine on a fixed-period timer and publishes each produced
//! snapshot. The loop is cancellable through a watch channel so shutdown
//! releases the artifact handle cleanly.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::state::AppState;

/// Advance the engine once and publish the result.
///
/// A failed publish is fatal to this attempt only: the error is logged,
/// the previous artifact stays intact, and the next tick retries.
pub async fn tick_once(state: &AppState) {
    let snapshot = state.engine.lock().await.tick();
    match state.persister.publish(&snapshot) {
        Ok(()) => debug!(tick = snapshot.tick(), "tick published"),
        Err(err) => error!(tick = snapshot.tick(), "artifact publish failed: {err}"),
    }
}

/// Spawn the recurring tick task. Stops when `shutdown` observes `true`.
pub fn spawn_ticker(state: AppState, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    let period = Duration::from_secs(state.update_seconds);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first interval tick fires immediately; the initial snapshot
        // was already produced at startup.
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    tick_once(&state).await;
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("tick scheduler stopping");
                        break;
                    }
                }
            }
        }
    })
}
