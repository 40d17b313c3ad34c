//! JSON file key/value backend
//!
//! Backs the durable scope. The whole map is rewritten on every mutation:
//! serialized to a sibling temp file, then renamed over the target so a
//! crash never leaves a half-written file behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use labgate_core::KeyValueStore;
use labgate_domain::{LabGateError, Result};
use parking_lot::RwLock;
use tracing::debug;

use crate::errors::InfraError;

/// File-backed [`KeyValueStore`] with an in-memory cache.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing entries.
    ///
    /// A missing file is an empty store.
    ///
    /// # Errors
    /// Returns `LabGateError::Storage` if the file cannot be read and
    /// `LabGateError::Serialization` if it is not a JSON string map.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(InfraError::from)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(InfraError::from(err).into()),
        };

        debug!(path = %path.display(), entries = entries.len(), "file store opened");
        Ok(Self { path, entries: RwLock::new(entries) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(InfraError::from)?;
        }

        let contents = serde_json::to_string_pretty(entries).map_err(InfraError::from)?;
        let staging = self.path.with_extension("tmp");
        std::fs::write(&staging, contents).map_err(InfraError::from)?;
        std::fs::rename(&staging, &self.path).map_err(|err| {
            LabGateError::Storage(format!(
                "failed to replace {}: {err}",
                self.path.display()
            ))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(err) = self.persist(&entries) {
            // Keep the cache consistent with the file
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write();
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };
        if let Err(err) = self.persist(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(err);
        }
        Ok(())
    }
}
