//! Medication entries scheduled for the active profile.
//!
//! Medications are scoped to a profile by storage key, not by a foreign-key
//! field: the list stored under `medications_{id}` belongs to profile `id`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MedMinderError, MedMinderResult};

/// Opaque identifier of a medication, unique within one profile's list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MedicationId(pub String);

impl MedicationId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MedicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MedicationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Frequencies offered when adding a medication. `frequency` itself is free
/// text, so stored values outside this list are kept verbatim.
pub const FREQUENCIES: [&str; 6] = [
    "Once daily",
    "Twice daily",
    "Three times daily",
    "Four times daily",
    "As needed",
    "Weekly",
];

/// The fixed category labels a medication can carry.
///
/// Unrecognised labels read back from storage decode as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MedicationType {
    Heart,
    Diabetes,
    #[serde(rename = "Blood Pressure")]
    BloodPressure,
    Pain,
    #[serde(rename = "Mental Health")]
    MentalHealth,
    Vitamin,
    #[serde(other)]
    Other,
}

impl MedicationType {
    pub const ALL: [MedicationType; 7] = [
        MedicationType::Heart,
        MedicationType::Diabetes,
        MedicationType::BloodPressure,
        MedicationType::Pain,
        MedicationType::MentalHealth,
        MedicationType::Vitamin,
        MedicationType::Other,
    ];

    /// The display label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            MedicationType::Heart => "Heart",
            MedicationType::Diabetes => "Diabetes",
            MedicationType::BloodPressure => "Blood Pressure",
            MedicationType::Pain => "Pain",
            MedicationType::MentalHealth => "Mental Health",
            MedicationType::Vitamin => "Vitamin",
            MedicationType::Other => "Other",
        }
    }
}

impl fmt::Display for MedicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for MedicationType {
    type Err = MedMinderError;

    /// Case-insensitive; accepts `blood-pressure` and `blood_pressure` as
    /// well as the display label.
    fn from_str(s: &str) -> MedMinderResult<Self> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        MedicationType::ALL
            .into_iter()
            .find(|t| t.label().to_lowercase() == wanted)
            .ok_or_else(|| {
                MedMinderError::validation(
                    "type",
                    format!("'{}' is not a known medication type", s.trim()),
                )
            })
    }
}

/// One prescribed item on a profile's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: MedicationId,
    pub name: String,
    /// Free text, units included (e.g. "500mg").
    pub dosage: String,
    pub frequency: String,
    /// Scheduled time of day, "HH:MM".
    pub time: String,
    #[serde(rename = "type")]
    pub kind: MedicationType,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub taken: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<DateTime<Utc>>,
}

/// Input for adding a medication: everything except `id` and `taken`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub time: String,
    pub kind: MedicationType,
    pub notes: String,
}

impl NewMedication {
    /// Name, dosage, frequency and time must be non-blank.
    ///
    /// As with profiles, this is a form-level rule; `add_medication` accepts
    /// whatever it is given.
    pub fn validate(&self) -> MedMinderResult<()> {
        let required = [
            ("name", &self.name),
            ("dosage", &self.dosage),
            ("frequency", &self.frequency),
            ("time", &self.time),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(MedMinderError::validation(field, "this field is required"));
            }
        }
        Ok(())
    }

    pub fn into_medication(self, id: MedicationId) -> Medication {
        Medication {
            id,
            name: self.name,
            dosage: self.dosage,
            frequency: self.frequency,
            time: self.time,
            kind: self.kind,
            notes: self.notes,
            taken: false,
            taken_at: None,
        }
    }
}

/// A partial set of medication fields to merge into an existing entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicationUpdate {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub time: Option<String>,
    pub kind: Option<MedicationType>,
    pub notes: Option<String>,
    pub taken: Option<bool>,
}

impl MedicationUpdate {
    /// Merge the set fields into `medication`.
    ///
    /// `takenAt` follows `taken`: it is stamped with `now` when the entry
    /// becomes taken, kept if it already was, and cleared when it is reset.
    pub fn apply_to(self, medication: &mut Medication, now: DateTime<Utc>) {
        if let Some(v) = self.name {
            medication.name = v;
        }
        if let Some(v) = self.dosage {
            medication.dosage = v;
        }
        if let Some(v) = self.frequency {
            medication.frequency = v;
        }
        if let Some(v) = self.time {
            medication.time = v;
        }
        if let Some(v) = self.kind {
            medication.kind = v;
        }
        if let Some(v) = self.notes {
            medication.notes = v;
        }
        if let Some(taken) = self.taken {
            if !taken {
                medication.taken_at = None;
            } else if !medication.taken || medication.taken_at.is_none() {
                medication.taken_at = Some(now);
            }
            medication.taken = taken;
        }
    }
}
