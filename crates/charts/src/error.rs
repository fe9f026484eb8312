//! Renderer errors

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartsError>;

#[derive(Debug, Error)]
pub enum ChartsError {
    #[error("missing file: {0}")]
    MissingFile(PathBuf),

    #[error("missing required column '{column}' in {file}")]
    MissingColumn { file: PathBuf, column: String },

    #[error("no comparative-* folder found in {0}")]
    NoComparativeDir(PathBuf),

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
