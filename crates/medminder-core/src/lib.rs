//! # medminder-core
//!
//! The profile store for MedMinder and the seams it is built on.
//!
//! This crate provides:
//! - The seam traits (`KeyValueStore`, `Clock`, `AuthService`) and the
//!   session gate built on `AuthService`
//! - `ProfileStore`, which owns the active profile, its medications and its
//!   health metrics, and mirrors them into a key-value backend
//! - Default seeding, metric classification helpers, and TOML configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medminder_core::{ProfileStore, traits::SystemClock};
//! use medminder_storage::InMemoryStore;
//!
//! let mut store = ProfileStore::new(Box::new(InMemoryStore::new()), Box::new(SystemClock));
//! store.restore()?;
//! ```

pub mod config;
pub mod metrics;
pub mod seed;
pub mod session;
pub mod store;
pub mod traits;

pub use config::{MedMinderConfig, SeedingPolicy};
pub use store::{Adherence, ProfileStore};

// ── Tests ─────────────────────────────────────────────────────────────────────
