//! JSON-file implementation of `KeyValueStore`.
//!
//! The whole store is one JSON object of string keys to string values, the
//! same shape as browser local storage. It is read once on open, and every
//! `set`/`remove` rewrites the file: the new document goes to a sibling
//! `.tmp` file which is then renamed over the original, so a crash mid-write
//! leaves the previous version intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use medminder_contracts::error::{MedMinderError, MedMinderResult};
use medminder_core::traits::KeyValueStore;

/// A key-value backend persisted to a single JSON document on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty one if the file does not
    /// exist yet. The file itself is not created until the first write.
    ///
    /// Returns `Storage` if the file cannot be read and `Serialization` if
    /// it is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> MedMinderResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(MedMinderError::Storage {
                    reason: format!("failed to read store '{}': {}", path.display(), e),
                })
            }
        };

        info!(path = %path.display(), keys = entries.len(), "opened json store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MedMinderResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries.lock().map_err(|e| MedMinderError::Storage {
            reason: format!("json store lock poisoned: {}", e),
        })
    }

    /// Write `entries` to disk via a temp file and rename.
    fn flush(&self, entries: &BTreeMap<String, String>) -> MedMinderResult<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }
        fs::write(&tmp, json).map_err(|e| self.io_error("write", e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error("replace", e))?;

        debug!(path = %self.path.display(), keys = entries.len(), "json store flushed");
        Ok(())
    }

    fn io_error(&self, action: &str, e: std::io::Error) -> MedMinderError {
        MedMinderError::Storage {
            reason: format!("failed to {} store '{}': {}", action, self.path.display(), e),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> MedMinderResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    /// The in-memory map only changes once the file write succeeded.
    fn set(&self, key: &str, value: &str) -> MedMinderResult<()> {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> MedMinderResult<()> {
        let mut entries = self.lock()?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn keys(&self) -> MedMinderResult<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}
