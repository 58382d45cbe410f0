//! Session types exchanged with the authentication service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated session. Its presence gates access to the profile UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub email: String,
    pub display_name: String,
    pub started_at: DateTime<Utc>,
}
