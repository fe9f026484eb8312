//! Engine errors

use std::path::PathBuf;

use thiserror::Error;

/// Engine result type
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid error rate {0} (expected 0.0..=1.0)")]
    InvalidErrorRate(f64),

    #[error("invalid intensity bounds: min {min} must be below max {max}")]
    InvalidBounds { min: f64, max: f64 },

    #[error("no zones configured for the signal engine")]
    NoZones,

    #[error("failed to write artifact {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    SnapshotSerialize(#[from] serde_json::Error),
}
