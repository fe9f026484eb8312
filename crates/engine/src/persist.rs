//! Snapshot persistence
//!
//! Publishes the latest snapshot to a shared JSON artifact. Readers must
//! never observe a partial write, so the document is written to a
//! temporary sibling first and moved onto the canonical path with a single
//! atomic rename. A failed attempt leaves the previous artifact intact.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::signal::Snapshot;

/// Atomically publishes snapshots to one artifact path.
pub struct SnapshotPersister {
    path: PathBuf,
}

impl SnapshotPersister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `snapshot` and replace the artifact atomically.
    ///
    /// Fails loudly on any filesystem error; the caller decides whether to
    /// retry (the scheduler does, on the next tick).
    pub fn publish(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|source| Error::ArtifactWrite {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let mut body = serde_json::to_string_pretty(snapshot)?;
        body.push('\n');

        let tmp = self.tmp_path();
        fs::write(&tmp, body).map_err(|source| Error::ArtifactWrite {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| Error::ArtifactWrite {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), tick = snapshot.tick(), "artifact published");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut os = self.path.clone().into_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_base_zones, SignalConfig};
    use crate::signal::CarbonSignalEngine;
    use crate::types::ZoneId;
    use tempfile::TempDir;

    fn snapshot() -> Snapshot {
        let config = SignalConfig {
            base_zones: parse_base_zones("us-east:430,us-west:300"),
            ..SignalConfig::default()
        };
        let mut engine = CarbonSignalEngine::new(config).expect("engine should build");
        (*engine.tick_with_timestamp("2024-01-01T00:00:00.000Z")).clone()
    }

    #[test]
    fn test_publish_roundtrip() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("carbon-traces").join("latest.json");
        let persister = SnapshotPersister::new(&path);

        let original = snapshot();
        persister.publish(&original).expect("publish should succeed");

        let raw = fs::read_to_string(&path).expect("artifact should exist");
        assert!(raw.ends_with('\n'), "artifact should end with a newline");
        let read: Snapshot = serde_json::from_str(&raw).expect("artifact should parse");
        assert_eq!(read, original);
        assert!(read.zones.contains_key(&ZoneId::from("us-east")));
    }

    #[test]
    fn test_publish_replaces_previous_artifact() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("latest.json");
        let persister = SnapshotPersister::new(&path);

        let config = SignalConfig::default();
        let mut engine = CarbonSignalEngine::new(config).expect("engine should build");
        let first = engine.tick_with_timestamp("2024-01-01T00:00:00.000Z");
        persister.publish(&first).expect("publish should succeed");
        let second = engine.tick_with_timestamp("2024-01-01T00:00:15.000Z");
        persister.publish(&second).expect("publish should succeed");

        let read: Snapshot =
            serde_json::from_str(&fs::read_to_string(&path).expect("artifact should exist"))
                .expect("artifact should parse");
        assert_eq!(read.tick(), 2);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("latest.json");
        let persister = SnapshotPersister::new(&path);
        persister.publish(&snapshot()).expect("publish should succeed");
        assert!(!dir.path().join("latest.json.tmp").exists());
    }

    #[test]
    fn test_failed_write_keeps_previous_artifact() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("latest.json");
        let persister = SnapshotPersister::new(&path);
        let original = snapshot();
        persister.publish(&original).expect("publish should succeed");

        // Simulate a writer dying mid-temp-write: a stale, truncated tmp
        // file must never affect the canonical artifact.
        fs::write(persister.tmp_path(), "{\"zones\": {\"trunc").expect("tmp write");
        let read: Snapshot =
            serde_json::from_str(&fs::read_to_string(&path).expect("artifact should exist"))
                .expect("artifact should still parse");
        assert_eq!(read, original);
    }

    #[cfg(unix)]
    #[test]
    #[ignore] // Permission bits do not apply when run as root
    fn test_unwritable_directory_fails_loudly() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("tempdir");
        let sub = dir.path().join("locked");
        fs::create_dir(&sub).expect("mkdir");
        let path = sub.join("latest.json");
        let persister = SnapshotPersister::new(&path);
        persister.publish(&snapshot()).expect("first publish should succeed");

        let mut perms = fs::metadata(&sub).expect("metadata").permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&sub, perms).expect("chmod");

        let result = persister.publish(&snapshot());

        let mut restore = fs::metadata(&sub).expect("metadata").permissions();
        restore.set_mode(0o755);
        fs::set_permissions(&sub, restore).expect("chmod restore");

        assert!(matches!(result, Err(Error::ArtifactWrite { .. })));
        // Previous artifact must remain valid.
        let read: std::result::Result<Snapshot, _> =
            serde_json::from_str(&fs::read_to_string(&path).expect("artifact should exist"));
        assert!(read.is_ok());
    }
}
