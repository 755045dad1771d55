//! Destinations for rendered artifacts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use heatmap_common::{HeatmapError, HeatmapResult};
use tracing::debug;

/// Somewhere rendered images can be written by name.
pub trait ArtifactSink: Send + Sync {
    /// Store `bytes` as `name` and return where it went.
    fn write(&self, name: &str, bytes: &[u8]) -> HeatmapResult<PathBuf>;
}

/// Writes artifacts as files in a directory.
///
/// The directory is only created by [`DirectorySink::ensure_root`]; writes
/// into a missing directory fail.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory (and parents) if missing. Idempotent.
    pub fn ensure_root(&self) -> HeatmapResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            HeatmapError::Io(format!("cannot create {}: {}", self.root.display(), e))
        })
    }
}

impl ArtifactSink for DirectorySink {
    fn write(&self, name: &str, bytes: &[u8]) -> HeatmapResult<PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, bytes)
            .map_err(|e| HeatmapError::render(format!("writing {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote artifact");
        Ok(path)
    }
}

/// Keeps artifacts in memory, keyed by name.
///
/// Each write is a single map insert, so a lock poisoned by a panicking
/// writer still holds a consistent map and is read through.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.artifacts().get(name).cloned()
    }

    /// Stored names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.artifacts().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.artifacts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn artifacts(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.artifacts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ArtifactSink for MemorySink {
    fn write(&self, name: &str, bytes: &[u8]) -> HeatmapResult<PathBuf> {
        self.artifacts().insert(name.to_string(), bytes.to_vec());
        Ok(PathBuf::from(name))
    }
}
