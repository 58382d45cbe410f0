//! In-memory implementation of `KeyValueStore`.
//!
//! `InMemoryStore` keeps entries in a `BTreeMap` behind `Arc<Mutex<_>>`.
//! Clones share the same map, so a test (or a second front end in the same
//! process) can observe exactly what the profile store wrote.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use medminder_contracts::error::{MedMinderError, MedMinderResult};
use medminder_core::traits::KeyValueStore;

/// A process-local key-value backend. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub(crate) entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> MedMinderResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> MedMinderResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Copy of every entry, sorted by key.
    pub fn snapshot(&self) -> MedMinderResult<BTreeMap<String, String>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> MedMinderResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries.lock().map_err(|e| MedMinderError::Storage {
            reason: format!("in-memory store lock poisoned: {}", e),
        })
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> MedMinderResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> MedMinderResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> MedMinderResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> MedMinderResult<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}
