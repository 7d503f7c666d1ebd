//! Incremental build manifest.
//!
//! Maps each workbook path to the modification time (nanoseconds since the
//! Unix epoch) it had when it was last built successfully. The on-disk form
//! is a JSON object of path strings to integers.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use parking_lot::Mutex;

use crate::error::{Error, Result};

/// Default manifest location, relative to the working directory
pub const DEFAULT_MANIFEST_PATH: &str = "./fileRecord.json";

/// Workbook path to last-built modification time.
///
/// Safe to update from several workbook tasks at once.
#[derive(Debug)]
pub struct Manifest {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, i64>>,
}

impl Manifest {
    /// An empty manifest that will be saved to `path`
    pub fn empty<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Load the manifest at `path`.
    ///
    /// A missing or unreadable file yields an empty manifest.
    pub fn load<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable manifest {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no manifest at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("cannot read manifest {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// File the manifest is saved to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recorded modification time for a workbook
    pub fn get(&self, key: &str) -> Option<i64> {
        self.entries.lock().get(key).copied()
    }

    /// Whether the workbook was last built at exactly this modification time
    pub fn is_unchanged(&self, key: &str, modified: i64) -> bool {
        self.get(key) == Some(modified)
    }

    /// Record a successful build of a workbook
    pub fn record(&self, key: String, modified: i64) {
        self.entries.lock().insert(key, modified);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Write the manifest back to its file
    pub fn save(&self) -> Result<()> {
        let bytes = serde_json::to_vec(&*self.entries.lock())?;
        fs::write(&self.path, bytes).map_err(|source| Error::ManifestWrite {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("saved manifest {}", self.path.display());
        Ok(())
    }
}

/// Manifest key for a workbook: its absolute path when it can be resolved
pub fn manifest_key(path: &Path) -> String {
    fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

/// Modification time of a file in nanoseconds since the Unix epoch
pub fn modified_nanos(path: &Path) -> io::Result<i64> {
    let modified = fs::metadata(path)?.modified()?;
    let nanos = match modified.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_nanos() as i64,
        Err(before) => -(before.duration().as_nanos() as i64),
    };
    Ok(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::load(dir.path().join("fileRecord.json"));
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fileRecord.json");
        fs::write(&path, b"{not json").unwrap();
        assert!(Manifest::load(&path).is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fileRecord.json");

        let manifest = Manifest::empty(&path);
        assert_eq!(manifest.path(), path.as_path());
        manifest.record("/data/b.xlsx".into(), 20);
        manifest.record("/data/a.xlsx".into(), 1_700_000_000_123_456_789);
        manifest.save().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"/data/a.xlsx":1700000000123456789,"/data/b.xlsx":20}"#
        );

        let reloaded = Manifest::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.is_unchanged("/data/b.xlsx", 20));
        assert!(!reloaded.is_unchanged("/data/b.xlsx", 21));
        assert!(!reloaded.is_unchanged("/data/c.xlsx", 20));
    }

    #[test]
    fn test_concurrent_records() {
        let manifest = Arc::new(Manifest::empty("unused.json"));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let manifest = Arc::clone(&manifest);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        manifest.record(format!("wb-{t}-{i}"), i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(manifest.len(), 800);
    }

    #[test]
    fn test_modified_nanos_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.xlsx");
        fs::write(&path, b"x").unwrap();
        let first = modified_nanos(&path).unwrap();
        assert_eq!(modified_nanos(&path).unwrap(), first);
        assert!(first > 0);
    }

    #[test]
    fn test_manifest_key_is_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.xlsx");
        fs::write(&path, b"x").unwrap();
        assert!(Path::new(&manifest_key(&path)).is_absolute());
    }
}
