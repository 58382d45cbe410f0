//! Vital-sign readings.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const BLOOD_PRESSURE: &str = "Blood Pressure";
pub const HEART_RATE: &str = "Heart Rate";
pub const BLOOD_SUGAR: &str = "Blood Sugar";
pub const TEMPERATURE: &str = "Temperature";

/// Classification of a reading.
///
/// Anything other than the four known labels decodes as `Unknown` rather
/// than failing the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Normal,
    Good,
    Warning,
    Danger,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MetricStatus::Normal => "normal",
            MetricStatus::Good => "good",
            MetricStatus::Warning => "warning",
            MetricStatus::Danger => "danger",
            MetricStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A named vital-sign reading.
///
/// The store does not enforce unique names; callers replace the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetric {
    pub name: String,
    /// Free text with units embedded, e.g. "120/80" or "72 BPM".
    pub value: String,
    pub status: MetricStatus,
    /// 0–100. Older clients wrote fractional values, so this is not an integer.
    pub progress: f64,
    pub timestamp: DateTime<Utc>,
}
