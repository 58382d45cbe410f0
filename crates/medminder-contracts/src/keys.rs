//! Key layout of the key-value backend.
//!
//! ```text
//! currentUserId        -> last active profile id (plain string)
//! user_{id}            -> JSON Profile
//! medications_{id}     -> JSON array of Medication
//! health_{id}          -> JSON array of HealthMetric
//! hasSeenOnboarding    -> "true" once onboarding is dismissed
//! session              -> JSON AuthSession while someone is signed in
//! account_{email}      -> JSON account record of the local auth service
//! ```

use crate::profile::ProfileId;

/// Holds the id of the last active profile.
pub const CURRENT_PROFILE_KEY: &str = "currentUserId";

/// Set to [`ONBOARDING_SEEN`] once the onboarding walkthrough is dismissed.
pub const ONBOARDING_KEY: &str = "hasSeenOnboarding";

/// Sentinel value stored under [`ONBOARDING_KEY`].
pub const ONBOARDING_SEEN: &str = "true";

/// Holds the signed-in session, if any.
pub const SESSION_KEY: &str = "session";

/// Prefix shared by every persisted profile record.
pub const PROFILE_PREFIX: &str = "user_";

const MEDICATIONS_PREFIX: &str = "medications_";
const HEALTH_PREFIX: &str = "health_";
const ACCOUNT_PREFIX: &str = "account_";

pub fn profile_key(id: &ProfileId) -> String {
    format!("{}{}", PROFILE_PREFIX, id.0)
}

pub fn medications_key(id: &ProfileId) -> String {
    format!("{}{}", MEDICATIONS_PREFIX, id.0)
}

pub fn health_key(id: &ProfileId) -> String {
    format!("{}{}", HEALTH_PREFIX, id.0)
}

/// Account record key. `email` is expected to be normalised already.
pub fn account_key(email: &str) -> String {
    format!("{}{}", ACCOUNT_PREFIX, email)
}

/// Extract the profile id from a `user_{id}` key, if it is one.
pub fn profile_id_from_key(key: &str) -> Option<ProfileId> {
    key.strip_prefix(PROFILE_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(|rest| ProfileId(rest.to_string()))
}
