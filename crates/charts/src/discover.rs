//! Input directory discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChartsError, Result};

/// Find the most recently modified `comparative-*` directory under `base`.
pub fn latest_comparative_dir(base: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(base).map_err(|source| ChartsError::Io {
        path: base.to_path_buf(),
        source,
    })?;

    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_candidate = path.is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with("comparative-"));
        if !is_candidate {
            continue;
        }
        let mtime = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
        if newest.as_ref().map_or(true, |(best, _)| mtime > *best) {
            newest = Some((mtime, path));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| ChartsError::NoComparativeDir(base.to_path_buf()))
}
