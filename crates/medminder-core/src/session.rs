//! Session gate in front of profile data.

use medminder_contracts::{
    auth::AuthSession,
    error::{MedMinderError, MedMinderResult},
};

use crate::traits::AuthService;

/// The current session, or an `Auth` error when nobody is signed in.
///
/// Front ends call this before any profile, medication or metric command.
pub fn require_session(auth: &dyn AuthService) -> MedMinderResult<AuthSession> {
    auth.session().ok_or_else(|| MedMinderError::Auth {
        reason: "not signed in; run `medminder auth sign-in` first".to_string(),
    })
}
