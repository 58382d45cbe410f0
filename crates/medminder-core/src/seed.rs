//! Default records for a profile with nothing persisted yet.

use chrono::{DateTime, Utc};

use medminder_contracts::{
    medication::{Medication, MedicationId, MedicationType},
    metric::{HealthMetric, MetricStatus, BLOOD_PRESSURE, BLOOD_SUGAR, HEART_RATE, TEMPERATURE},
};

/// One starter medication: a daily low-dose aspirin.
pub fn default_medications() -> Vec<Medication> {
    vec![Medication {
        id: MedicationId::generate(),
        name: "Aspirin".to_string(),
        dosage: "75mg".to_string(),
        frequency: "Once daily".to_string(),
        time: "09:00".to_string(),
        kind: MedicationType::Heart,
        notes: "Take with food".to_string(),
        taken: false,
        taken_at: None,
    }]
}

/// The four baseline vitals, all stamped with `now`.
pub fn default_health_metrics(now: DateTime<Utc>) -> Vec<HealthMetric> {
    let metric = |name: &str, value: &str, status, progress| HealthMetric {
        name: name.to_string(),
        value: value.to_string(),
        status,
        progress,
        timestamp: now,
    };

    vec![
        metric(BLOOD_PRESSURE, "120/80", MetricStatus::Normal, 85.0),
        metric(HEART_RATE, "72 BPM", MetricStatus::Good, 90.0),
        metric(BLOOD_SUGAR, "95 mg/dL", MetricStatus::Normal, 80.0),
        metric(TEMPERATURE, "98.6°F", MetricStatus::Normal, 95.0),
    ]
}
