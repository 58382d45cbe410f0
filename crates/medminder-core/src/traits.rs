//! Seam traits for the MedMinder profile store.
//!
//! - `KeyValueStore`: flat string-to-string persistence (browser storage,
//!   a JSON file, or an in-memory map in tests)
//! - `Clock`: source of "now" for timestamps
//! - `AuthService`: session gate in front of the profile UI
//!
//! The store owns boxed trait objects so each test can build an independent
//! instance against its own fake backend.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use medminder_contracts::{auth::AuthSession, error::MedMinderResult};

/// A synchronous key-value backend.
///
/// Every call completes before returning; there is no batching or queueing.
/// Implementations take `&self` and handle interior mutability themselves.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> MedMinderResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> MedMinderResult<()>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> MedMinderResult<()>;

    /// Every key currently stored, in no particular order.
    fn keys(&self) -> MedMinderResult<Vec<String>>;
}

/// A shared backend: the profile store and the auth service can sit on the
/// same data file.
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> MedMinderResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> MedMinderResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> MedMinderResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> MedMinderResult<Vec<String>> {
        (**self).keys()
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The remote authentication service, reduced to what the app consumes.
///
/// Front ends check `session()` before giving access to profile data; see
/// [`crate::session::require_session`].
///
/// Failures come back as `MedMinderError::Auth` carrying a user-facing
/// message.
pub trait AuthService: Send + Sync {
    /// The current session, if someone is signed in.
    fn session(&self) -> Option<AuthSession>;

    fn sign_in(&self, email: &str, password: &str) -> MedMinderResult<AuthSession>;

    /// Register a new account. Does not start a session.
    fn sign_up(&self, email: &str, password: &str, display_name: &str) -> MedMinderResult<()>;

    fn sign_out(&self) -> MedMinderResult<()>;
}
