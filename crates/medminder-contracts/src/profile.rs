//! Profile identity records.
//!
//! A `Profile` is one person using the app, either a patient or a caregiver.
//! Its `id` is assigned once at creation and never changes; every other
//! field may be edited through a [`ProfileUpdate`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MedMinderError, MedMinderResult};

/// Opaque, immutable identifier of a profile.
///
/// New ids are UUID v4 strings, but any string read back from storage is
/// accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(pub String);

impl ProfileId {
    /// Generate a fresh, unique profile id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Whether the profile belongs to the person taking the medication or to
/// someone looking after them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Caregiver,
}

impl std::str::FromStr for Role {
    type Err = MedMinderError;

    fn from_str(s: &str) -> MedMinderResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "caregiver" => Ok(Role::Caregiver),
            other => Err(MedMinderError::validation(
                "role",
                format!("'{}' is not one of patient, caregiver", other),
            )),
        }
    }
}

/// Score a newly registered profile starts with.
pub const DEFAULT_HEALTH_SCORE: u8 = 100;

fn default_health_score() -> u8 {
    DEFAULT_HEALTH_SCORE
}

/// The persisted identity record for one person.
///
/// Field names serialize in camelCase so blobs written by earlier clients
/// (`emergencyContact`, `lastActive`, ...) load without migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub age: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub emergency_contact: String,
    #[serde(default)]
    pub medical_conditions: String,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub doctor_phone: String,
    /// Consecutive days with every dose taken.
    #[serde(default)]
    pub health_streak: u32,
    /// Recomputed from the medication list on every save.
    #[serde(default)]
    pub total_medications: u32,
    /// Recomputed from the medication list on every save.
    #[serde(default)]
    pub completed_today: u32,
    /// 0–100. Records written without one read as a fresh profile's score.
    #[serde(default = "default_health_score")]
    pub health_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// Registration input: everything a `Profile` carries except the fields the
/// store assigns (`id`, `createdAt`, `lastActive`).
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub name: String,
    pub age: String,
    pub email: String,
    pub phone: String,
    pub emergency_contact: String,
    pub medical_conditions: String,
    pub allergies: String,
    pub doctor_name: String,
    pub doctor_phone: String,
    pub health_streak: u32,
    pub total_medications: u32,
    pub completed_today: u32,
    pub health_score: u8,
    pub role: Option<Role>,
}

impl NewProfile {
    /// A registration with the welcome-screen defaults: no streak, no
    /// medications, a perfect health score, and the patient role.
    pub fn new(name: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            email: String::new(),
            phone: String::new(),
            emergency_contact: String::new(),
            medical_conditions: String::new(),
            allergies: String::new(),
            doctor_name: String::new(),
            doctor_phone: String::new(),
            health_streak: 0,
            total_medications: 0,
            completed_today: 0,
            health_score: DEFAULT_HEALTH_SCORE,
            role: Some(Role::Patient),
        }
    }

    /// Registration requires a name and an age; everything else is optional.
    ///
    /// The store itself never calls this. Front ends run it before
    /// `ProfileStore::create_profile`.
    pub fn validate(&self) -> MedMinderResult<()> {
        if self.name.trim().is_empty() {
            return Err(MedMinderError::validation("name", "a name is required"));
        }
        if self.age.trim().is_empty() {
            return Err(MedMinderError::validation("age", "an age is required"));
        }
        Ok(())
    }

    /// Stamp the registration with its id and creation time.
    ///
    /// `createdAt` and `lastActive` are both set to `now`.
    pub fn into_profile(self, id: ProfileId, now: DateTime<Utc>) -> Profile {
        Profile {
            id,
            name: self.name,
            age: self.age,
            email: self.email,
            phone: self.phone,
            emergency_contact: self.emergency_contact,
            medical_conditions: self.medical_conditions,
            allergies: self.allergies,
            doctor_name: self.doctor_name,
            doctor_phone: self.doctor_phone,
            health_streak: self.health_streak,
            total_medications: self.total_medications,
            completed_today: self.completed_today,
            health_score: self.health_score.min(100),
            role: self.role,
            created_at: now,
            last_active: now,
        }
    }
}

/// A partial set of profile fields to merge into the active profile.
///
/// `None` leaves the field untouched. The id is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub medical_conditions: Option<String>,
    pub allergies: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_phone: Option<String>,
    pub health_streak: Option<u32>,
    pub health_score: Option<u8>,
    pub role: Option<Role>,
}

impl ProfileUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the set fields into `profile`.
    pub fn apply_to(self, profile: &mut Profile) {
        if let Some(v) = self.name {
            profile.name = v;
        }
        if let Some(v) = self.age {
            profile.age = v;
        }
        if let Some(v) = self.email {
            profile.email = v;
        }
        if let Some(v) = self.phone {
            profile.phone = v;
        }
        if let Some(v) = self.emergency_contact {
            profile.emergency_contact = v;
        }
        if let Some(v) = self.medical_conditions {
            profile.medical_conditions = v;
        }
        if let Some(v) = self.allergies {
            profile.allergies = v;
        }
        if let Some(v) = self.doctor_name {
            profile.doctor_name = v;
        }
        if let Some(v) = self.doctor_phone {
            profile.doctor_phone = v;
        }
        if let Some(v) = self.health_streak {
            profile.health_streak = v;
        }
        if let Some(v) = self.health_score {
            profile.health_score = v.min(100);
        }
        if let Some(v) = self.role {
            profile.role = Some(v);
        }
    }
}
