//! Local stand-in for the remote authentication service.
//!
//! Accounts and the current session live in the same `KeyValueStore` as the
//! profile data, so a session outlasts the process that opened it. Accounts
//! are keyed by lowercased email. Passwords are never kept in clear: each
//! account stores a random salt and the hex SHA-256 of `salt || password`.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use medminder_contracts::{
    auth::AuthSession,
    error::{MedMinderError, MedMinderResult},
    keys::{self, SESSION_KEY},
};
use medminder_core::traits::{AuthService, KeyValueStore};

/// Shortest password the service accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Account {
    email: String,
    display_name: String,
    salt: String,
    password_hash: String,
}

/// Hex SHA-256 of `salt` followed by `password`.
fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn auth_error(reason: impl Into<String>) -> MedMinderError {
    MedMinderError::Auth {
        reason: reason.into(),
    }
}

fn normalise(email: &str) -> String {
    email.trim().to_lowercase()
}

/// An `AuthService` persisted through a `KeyValueStore`.
pub struct StoredAuthService {
    backend: Arc<dyn KeyValueStore>,
    // Serialises sign-ups so the duplicate check and the write are atomic.
    registration: Mutex<()>,
}

impl StoredAuthService {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            registration: Mutex::new(()),
        }
    }

    fn registration_lock(&self) -> MedMinderResult<MutexGuard<'_, ()>> {
        self.registration
            .lock()
            .map_err(|e| auth_error(format!("auth registration lock poisoned: {}", e)))
    }

    fn account(&self, email: &str) -> MedMinderResult<Option<Account>> {
        match self.backend.get(&keys::account_key(email))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

impl AuthService for StoredAuthService {
    /// A session blob that cannot be read counts as signed out.
    fn session(&self) -> Option<AuthSession> {
        let raw = match self.backend.get(SESSION_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "could not read session");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "malformed session record; treating as signed out");
                None
            }
        }
    }

    fn sign_in(&self, email: &str, password: &str) -> MedMinderResult<AuthSession> {
        let key = normalise(email);

        let account = self
            .account(&key)?
            .filter(|a| hash_password(&a.salt, password) == a.password_hash)
            .ok_or_else(|| {
                warn!(email = %key, "sign-in rejected");
                auth_error("Invalid login credentials")
            })?;

        let session = AuthSession {
            email: account.email,
            display_name: account.display_name,
            started_at: Utc::now(),
        };
        self.backend.set(SESSION_KEY, &serde_json::to_string(&session)?)?;

        info!(email = %key, "signed in");
        Ok(session)
    }

    fn sign_up(&self, email: &str, password: &str, display_name: &str) -> MedMinderResult<()> {
        let key = normalise(email);
        if key.is_empty() || !key.contains('@') {
            return Err(auth_error("A valid email address is required"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(auth_error(format!(
                "Password should be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let _guard = self.registration_lock()?;
        if self.account(&key)?.is_some() {
            return Err(auth_error("User already registered"));
        }

        let salt = uuid::Uuid::new_v4().simple().to_string();
        let account = Account {
            email: key.clone(),
            display_name: display_name.trim().to_string(),
            password_hash: hash_password(&salt, password),
            salt,
        };
        self.backend
            .set(&keys::account_key(&key), &serde_json::to_string(&account)?)?;

        info!(email = %key, "account registered");
        Ok(())
    }

    fn sign_out(&self) -> MedMinderResult<()> {
        if let Some(session) = self.session() {
            info!(email = %session.email, "signed out");
        }
        self.backend.remove(SESSION_KEY)
    }
}

#[cfg(test)]
mod tests {
    use medminder_storage::InMemoryStore;

    use super::*;

    fn registered() -> (StoredAuthService, InMemoryStore) {
        let backend = InMemoryStore::new();
        let auth = StoredAuthService::new(Arc::new(backend.clone()));
        auth.sign_up("asha@example.com", "correct-horse", "Asha").unwrap();
        (auth, backend)
    }

    #[test]
    fn sign_up_does_not_start_a_session() {
        let (auth, _backend) = registered();
        assert!(auth.session().is_none());
    }

    #[test]
    fn sign_in_with_correct_password_opens_session() {
        let (auth, _backend) = registered();

        let session = auth.sign_in("  ASHA@example.com ", "correct-horse").unwrap();

        assert_eq!(session.email, "asha@example.com");
        assert_eq!(session.display_name, "Asha");
        assert_eq!(auth.session(), Some(session));
    }

    #[test]
    fn session_is_visible_to_a_later_service_on_the_same_backend() {
        let (auth, backend) = registered();
        let session = auth.sign_in("asha@example.com", "correct-horse").unwrap();

        let later = StoredAuthService::new(Arc::new(backend.clone()));
        assert_eq!(later.session(), Some(session));

        later.sign_out().unwrap();
        assert!(auth.session().is_none());
        assert!(backend.get(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn wrong_password_and_unknown_email_are_rejected() {
        let (auth, _backend) = registered();

        let err = auth.sign_in("asha@example.com", "wrong-horse").unwrap_err();
        assert!(err.to_string().contains("Invalid login credentials"));
        assert!(auth.sign_in("ravi@example.com", "correct-horse").is_err());
        assert!(auth.session().is_none());
    }

    #[test]
    fn sign_up_validates_input_and_rejects_duplicates() {
        let (auth, _backend) = registered();

        assert!(auth.sign_up("not-an-email", "correct-horse", "X").is_err());
        assert!(auth.sign_up("new@example.com", "short", "X").is_err());
        let err = auth.sign_up("Asha@Example.com", "another-pass", "Asha").unwrap_err();
        assert!(matches!(err, MedMinderError::Auth { .. }));
    }

    #[test]
    fn password_is_not_stored_in_clear() {
        let (_auth, backend) = registered();

        let raw = backend.get(&keys::account_key("asha@example.com")).unwrap().unwrap();
        assert!(!raw.contains("correct-horse"));
        assert!(raw.contains("passwordHash"));
    }

    #[test]
    fn malformed_session_reads_as_signed_out() {
        let (auth, backend) = registered();
        backend.set(SESSION_KEY, "{oops").unwrap();

        assert!(auth.session().is_none());
    }

    #[test]
    fn sign_out_ends_the_session() {
        let (auth, _backend) = registered();
        auth.sign_in("asha@example.com", "correct-horse").unwrap();

        auth.sign_out().unwrap();
        auth.sign_out().unwrap();

        assert!(auth.session().is_none());
    }

    #[test]
    fn stored_hash_is_salted() {
        let salt_a = "aaaa";
        let salt_b = "bbbb";
        assert_ne!(hash_password(salt_a, "pw"), hash_password(salt_b, "pw"));
        assert_eq!(hash_password(salt_a, "pw").len(), 64);
    }
}
