//! # medminder-contracts
//!
//! Shared entity types, storage-key layout, and errors for MedMinder.
//!
//! Every other crate in the workspace imports from here. No business logic
//! lives in this crate, only data definitions, partial-update merges, and
//! form-level validation helpers.

pub mod auth;
pub mod error;
pub mod keys;
pub mod medication;
pub mod metric;
pub mod profile;

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use error::MedMinderError;
    use medication::{Medication, MedicationId, MedicationType, MedicationUpdate, NewMedication};
    use metric::{HealthMetric, MetricStatus};
    use profile::{NewProfile, Profile, ProfileId, ProfileUpdate, Role};

    fn sample_profile() -> Profile {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        NewProfile::new("Asha", "30").into_profile(ProfileId::from("p-1"), now)
    }

    // ── Persisted layout ─────────────────────────────────────────────────────

    #[test]
    fn profile_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(sample_profile()).unwrap();

        assert_eq!(value["id"], "p-1");
        assert_eq!(value["healthScore"], 100);
        assert_eq!(value["role"], "patient");
        assert!(value.get("emergencyContact").is_some());
        assert!(value.get("lastActive").is_some());
        assert!(value.get("last_active").is_none());
    }

    #[test]
    fn profile_without_optional_fields_still_decodes() {
        let blob = json!({
            "id": "legacy",
            "name": "Ravi",
            "age": "71",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "lastActive": "2024-01-02T00:00:00.000Z"
        });
        let profile: Profile = serde_json::from_value(blob).unwrap();

        assert_eq!(profile.id, ProfileId::from("legacy"));
        assert_eq!(profile.role, None);
        assert_eq!(profile.health_streak, 0);
        assert!(profile.email.is_empty());
        assert_eq!(profile.health_score, NewProfile::new("x", "1").health_score);
    }

    #[test]
    fn medication_type_uses_display_labels_on_the_wire() {
        let med = NewMedication {
            name: "Lisinopril".to_string(),
            dosage: "10mg".to_string(),
            frequency: "Once daily".to_string(),
            time: "08:00".to_string(),
            kind: MedicationType::BloodPressure,
            notes: String::new(),
        }
        .into_medication(MedicationId::from("m-1"));

        let value = serde_json::to_value(&med).unwrap();
        assert_eq!(value["type"], "Blood Pressure");
        assert_eq!(value["taken"], false);
        assert!(value.get("takenAt").is_none());
    }

    #[test]
    fn unknown_medication_type_decodes_as_other() {
        let blob = json!({
            "id": "1", "name": "Zinc", "dosage": "10mg", "frequency": "Weekly",
            "time": "10:00", "type": "Supplement", "notes": "", "taken": false
        });
        let med: Medication = serde_json::from_value(blob).unwrap();
        assert_eq!(med.kind, MedicationType::Other);
    }

    #[test]
    fn metric_accepts_fractional_progress_and_unknown_status() {
        let blob = json!({
            "name": "Heart Rate", "value": "72 BPM", "status": "excellent",
            "progress": 63.25, "timestamp": "2024-01-01T00:00:00Z"
        });
        let metric: HealthMetric = serde_json::from_value(blob).unwrap();
        assert_eq!(metric.status, MetricStatus::Unknown);
        assert!((metric.progress - 63.25).abs() < f64::EPSILON);
    }

    // ── Keys ─────────────────────────────────────────────────────────────────

    #[test]
    fn keys_follow_prefix_convention() {
        let id = ProfileId::from("abc");
        assert_eq!(keys::profile_key(&id), "user_abc");
        assert_eq!(keys::medications_key(&id), "medications_abc");
        assert_eq!(keys::health_key(&id), "health_abc");
        assert_eq!(keys::profile_id_from_key("user_abc"), Some(id));
        assert_eq!(keys::profile_id_from_key("user_"), None);
        assert_eq!(keys::profile_id_from_key("medications_abc"), None);
        assert_eq!(keys::account_key("asha@example.com"), "account_asha@example.com");
        assert_eq!(keys::profile_id_from_key(&keys::account_key("asha@example.com")), None);
    }

    // ── Validation and merges ────────────────────────────────────────────────

    #[test]
    fn new_profile_requires_name_and_age() {
        assert!(NewProfile::new("Asha", "30").validate().is_ok());

        let err = NewProfile::new("  ", "30").validate().unwrap_err();
        assert!(matches!(err, MedMinderError::Validation { ref field, .. } if field == "name"));

        let err = NewProfile::new("Asha", "").validate().unwrap_err();
        assert!(matches!(err, MedMinderError::Validation { ref field, .. } if field == "age"));
    }

    #[test]
    fn new_profile_stamps_identical_timestamps() {
        let profile = sample_profile();
        assert_eq!(profile.created_at, profile.last_active);
    }

    #[test]
    fn profile_update_merges_only_set_fields() {
        let mut profile = sample_profile();
        ProfileUpdate {
            phone: Some("+91-90000-00000".to_string()),
            health_score: Some(250),
            role: Some(Role::Caregiver),
            ..Default::default()
        }
        .apply_to(&mut profile);

        assert_eq!(profile.name, "Asha");
        assert_eq!(profile.phone, "+91-90000-00000");
        assert_eq!(profile.health_score, 100);
        assert_eq!(profile.role, Some(Role::Caregiver));
        assert!(ProfileUpdate::default().is_empty());
    }

    fn aspirin() -> Medication {
        NewMedication {
            name: "Aspirin".to_string(),
            dosage: "75mg".to_string(),
            frequency: "Once daily".to_string(),
            time: "09:00".to_string(),
            kind: MedicationType::Heart,
            notes: String::new(),
        }
        .into_medication(MedicationId::from("m-9"))
    }

    fn taken(value: bool) -> MedicationUpdate {
        MedicationUpdate {
            taken: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn medication_update_leaves_id_alone() {
        let mut med = aspirin();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        MedicationUpdate {
            dosage: Some("150mg".to_string()),
            ..Default::default()
        }
        .apply_to(&mut med, now);

        assert_eq!(med.id, MedicationId::from("m-9"));
        assert_eq!(med.dosage, "150mg");
        assert_eq!(med.name, "Aspirin");
    }

    #[test]
    fn taken_at_follows_taken_flag() {
        let mut med = aspirin();
        let morning = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let noon = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        taken(true).apply_to(&mut med, morning);
        assert!(med.taken);
        assert_eq!(med.taken_at, Some(morning));

        // Already taken: the first timestamp stays.
        taken(true).apply_to(&mut med, noon);
        assert_eq!(med.taken_at, Some(morning));

        taken(false).apply_to(&mut med, noon);
        assert!(!med.taken);
        assert_eq!(med.taken_at, None);
    }

    #[test]
    fn medication_type_parses_loosely() {
        assert_eq!("blood-pressure".parse::<MedicationType>().unwrap(), MedicationType::BloodPressure);
        assert_eq!("MENTAL HEALTH".parse::<MedicationType>().unwrap(), MedicationType::MentalHealth);
        assert!("antibiotic".parse::<MedicationType>().is_err());
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn error_display_includes_context() {
        let err = MedMinderError::validation("phone", "a phone number is required");
        let msg = err.to_string();
        assert!(msg.contains("phone"));
        assert!(msg.contains("required"));

        let err = MedMinderError::Storage {
            reason: "disk full".to_string(),
        };
        assert!(err.to_string().contains("storage error"));
    }

    #[test]
    fn json_errors_convert_to_serialization() {
        let parse_err = serde_json::from_str::<Profile>("{not json").unwrap_err();
        let err: MedMinderError = parse_err.into();
        assert!(matches!(err, MedMinderError::Serialization { .. }));
    }
}
