//! # medminder-services
//!
//! Simulated companion services around the MedMinder profile store.
//!
//! None of these perform real inference, recognition, or networking:
//!
//! 1. **assistant**: keyword-routed canned health answers in English and
//!    Hindi, with a chat transcript.
//! 2. **pill**: a random one- or two-record "identification" from a fixed
//!    catalog, plus text search over it.
//! 3. **voice**: canned transcripts, substring intent matching, and a
//!    spoken-reminder list.
//! 4. **contacts**: an in-session emergency-contact directory.
//! 5. **auth**: a local implementation of
//!    [`AuthService`](medminder_core::traits::AuthService).

pub mod assistant;
pub mod auth;
pub mod contacts;
pub mod pill;
pub mod voice;

pub use assistant::{ChatSession, Language};
pub use auth::StoredAuthService;
pub use contacts::ContactDirectory;
pub use voice::VoiceAssistant;
