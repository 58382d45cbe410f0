//! # medminder-storage
//!
//! Key-value backends for the MedMinder profile store.
//!
//! ## Overview
//!
//! - [`InMemoryStore`]: a shared `BTreeMap`, for tests and ephemeral sessions.
//! - [`JsonFileStore`]: one JSON document on disk, rewritten atomically on
//!   every write. This is what the CLI uses.
//!
//! Both implement [`KeyValueStore`](medminder_core::traits::KeyValueStore),
//! so either can be boxed into a `ProfileStore`.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;

    use medminder_contracts::{
        error::MedMinderError,
        keys,
        medication::{MedicationType, NewMedication},
        profile::NewProfile,
    };
    use medminder_core::{
        traits::{KeyValueStore, SystemClock},
        ProfileStore,
    };

    use super::{InMemoryStore, JsonFileStore};

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// A fresh path under the system temp dir; the file does not exist yet.
    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("medminder-test-{}.json", uuid::Uuid::new_v4()))
    }

    fn vitamin_d() -> NewMedication {
        NewMedication {
            name: "Vitamin D3".to_string(),
            dosage: "1000 IU".to_string(),
            frequency: "Once daily".to_string(),
            time: "07:30".to_string(),
            kind: MedicationType::Vitamin,
            notes: "With breakfast".to_string(),
        }
    }

    // ── InMemoryStore ─────────────────────────────────────────────────────────

    #[test]
    fn memory_store_set_get_remove() {
        let store = InMemoryStore::new();
        assert!(store.is_empty().unwrap());

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len().unwrap(), 1);

        store.remove("a").unwrap();
        store.remove("never-there").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let store = InMemoryStore::new();
        let observer = store.clone();

        store.set("currentUserId", "p-1").unwrap();

        assert_eq!(observer.keys().unwrap(), vec!["currentUserId".to_string()]);
        assert_eq!(observer.snapshot().unwrap().get("currentUserId").map(String::as_str), Some("p-1"));
    }

    #[test]
    fn poisoned_memory_store_reports_storage_errors() {
        let store = InMemoryStore::new();
        store.set("a", "1").unwrap();

        let holder = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.entries.lock().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(MedMinderError::Storage { .. })));
        assert!(matches!(store.is_empty(), Err(MedMinderError::Storage { .. })));
        assert!(matches!(store.snapshot(), Err(MedMinderError::Storage { .. })));
    }

    #[test]
    fn profile_store_writes_through_to_memory_store() {
        let backend = InMemoryStore::new();
        let mut store = ProfileStore::new(Box::new(backend.clone()), Box::new(SystemClock));

        let id = store.create_profile(NewProfile::new("Asha", "30")).unwrap();
        store.add_medication(vitamin_d()).unwrap();

        let snapshot = backend.snapshot().unwrap();
        assert!(snapshot.contains_key(&keys::profile_key(&id)));
        assert!(snapshot[&keys::medications_key(&id)].contains("Vitamin D3"));
    }

    // ── JsonFileStore ─────────────────────────────────────────────────────────

    #[test]
    fn file_store_opens_missing_file_as_empty() {
        let path = temp_path();
        let store = JsonFileStore::open(&path).unwrap();

        assert!(store.keys().unwrap().is_empty());
        assert!(!path.exists(), "opening must not create the file");
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = temp_path();
        {
            let store = JsonFileStore::open(&path).unwrap();
            store.set("hasSeenOnboarding", "true").unwrap();
            store.set("user_x", "{}").unwrap();
            store.remove("user_x").unwrap();
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("hasSeenOnboarding").unwrap().as_deref(), Some("true"));
        assert_eq!(reopened.get("user_x").unwrap(), None);
        assert!(!path.with_extension("tmp").exists());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn shared_file_store_serves_two_owners() {
        let path = temp_path();
        let backend = Arc::new(JsonFileStore::open(&path).unwrap());
        let mut store = ProfileStore::new(Box::new(Arc::clone(&backend)), Box::new(SystemClock));

        let id = store.create_profile(NewProfile::new("Meera", "44")).unwrap();
        backend.set(keys::SESSION_KEY, "{}").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert!(reopened.get(&keys::profile_key(&id)).unwrap().is_some());
        assert!(reopened.get(keys::SESSION_KEY).unwrap().is_some());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn file_store_rejects_malformed_document() {
        let path = temp_path();
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, MedMinderError::Serialization { .. }));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn profile_store_state_survives_process_restart() {
        let path = temp_path();
        let (profile_id, med_id) = {
            let backend = JsonFileStore::open(&path).unwrap();
            let mut store = ProfileStore::new(Box::new(backend), Box::new(SystemClock));
            let profile_id = store.create_profile(NewProfile::new("Ravi", "71")).unwrap();
            let med_id = store.add_medication(vitamin_d()).unwrap().unwrap();
            store.mark_medication_taken(&med_id).unwrap();
            (profile_id, med_id)
        };

        let backend = JsonFileStore::open(&path).unwrap();
        let mut store = ProfileStore::new(Box::new(backend), Box::new(SystemClock));
        assert!(store.restore().unwrap());

        assert_eq!(store.active_profile().unwrap().id, profile_id);
        assert_eq!(store.active_profile().unwrap().completed_today, 1);
        assert!(store.medication(&med_id).unwrap().taken);
        // Metrics were persisted (empty) alongside the medication write, so
        // restore does not seed them.
        assert!(store.health_metrics().is_empty());
        assert_eq!(store.list_all_profiles().unwrap().len(), 1);

        fs::remove_file(&path).unwrap();
    }
}
