//! Health-metric classification and list edits.
//!
//! The store only ever replaces the metric list wholesale. The helpers here
//! build the replacement list for the two edits the dashboard offers:
//! typing a new value, and recording a new reading's progress score.

use chrono::{DateTime, Utc};

use medminder_contracts::metric::{
    HealthMetric, MetricStatus, BLOOD_PRESSURE, BLOOD_SUGAR, HEART_RATE,
};

/// Classify a reading from its name and free-text value.
///
/// | Metric          | normal       | warning      | danger   |
/// |-----------------|--------------|--------------|----------|
/// | Blood Pressure  | systolic<120 | <140         | >=140    |
/// | Heart Rate      | 60..=100     | otherwise    |          |
/// | Blood Sugar     | 70..=100     | <=125        | >125     |
///
/// Other metrics, and values with no leading number, classify as normal.
pub fn classify_status(name: &str, value: &str) -> MetricStatus {
    match name {
        BLOOD_PRESSURE => {
            let systolic = value.split('/').next().and_then(leading_int);
            match systolic {
                Some(s) if s < 120 => MetricStatus::Normal,
                Some(s) if s < 140 => MetricStatus::Warning,
                Some(_) => MetricStatus::Danger,
                None => MetricStatus::Normal,
            }
        }
        HEART_RATE => match leading_int(value) {
            Some(hr) if (60..=100).contains(&hr) => MetricStatus::Normal,
            Some(_) => MetricStatus::Warning,
            None => MetricStatus::Normal,
        },
        BLOOD_SUGAR => match leading_int(value) {
            Some(bs) if (70..=100).contains(&bs) => MetricStatus::Normal,
            Some(bs) if bs <= 125 => MetricStatus::Warning,
            Some(_) => MetricStatus::Danger,
            None => MetricStatus::Normal,
        },
        _ => MetricStatus::Normal,
    }
}

/// Parse the integer prefix of `s`, ignoring leading whitespace
/// ("72 BPM" -> 72, "95 mg/dL" -> 95).
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Replace the value of the metric called `name`, reclassify it, and stamp
/// it with `now`. Other entries are returned untouched.
pub fn edit_metric_value(
    metrics: &[HealthMetric],
    name: &str,
    value: &str,
    now: DateTime<Utc>,
) -> Vec<HealthMetric> {
    metrics
        .iter()
        .map(|m| {
            if m.name == name {
                HealthMetric {
                    value: value.to_string(),
                    status: classify_status(name, value),
                    timestamp: now,
                    ..m.clone()
                }
            } else {
                m.clone()
            }
        })
        .collect()
}

/// Record a new reading's progress score (clamped to 0–100) for `name`.
///
/// Returns `None` when no metric has that name, so the caller can skip the
/// store update.
pub fn record_reading(
    metrics: &[HealthMetric],
    name: &str,
    progress: f64,
    now: DateTime<Utc>,
) -> Option<Vec<HealthMetric>> {
    if !metrics.iter().any(|m| m.name == name) {
        return None;
    }
    let progress = progress.clamp(0.0, 100.0);
    Some(
        metrics
            .iter()
            .map(|m| {
                if m.name == name {
                    HealthMetric {
                        progress,
                        timestamp: now,
                        ..m.clone()
                    }
                } else {
                    m.clone()
                }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use medminder_contracts::metric::TEMPERATURE;

    use super::*;
    use crate::seed::default_health_metrics;

    #[test]
    fn blood_pressure_bands() {
        assert_eq!(classify_status(BLOOD_PRESSURE, "118/76"), MetricStatus::Normal);
        assert_eq!(classify_status(BLOOD_PRESSURE, "135/85"), MetricStatus::Warning);
        assert_eq!(classify_status(BLOOD_PRESSURE, "150/95"), MetricStatus::Danger);
    }

    #[test]
    fn heart_rate_and_sugar_bands() {
        assert_eq!(classify_status(HEART_RATE, "72 BPM"), MetricStatus::Normal);
        assert_eq!(classify_status(HEART_RATE, "110 BPM"), MetricStatus::Warning);
        assert_eq!(classify_status(BLOOD_SUGAR, "95 mg/dL"), MetricStatus::Normal);
        assert_eq!(classify_status(BLOOD_SUGAR, "120 mg/dL"), MetricStatus::Warning);
        assert_eq!(classify_status(BLOOD_SUGAR, "180 mg/dL"), MetricStatus::Danger);
    }

    #[test]
    fn unparsable_and_unknown_metrics_are_normal() {
        assert_eq!(classify_status(HEART_RATE, "steady"), MetricStatus::Normal);
        assert_eq!(classify_status(TEMPERATURE, "104°F"), MetricStatus::Normal);
        assert_eq!(classify_status("Weight", "80kg"), MetricStatus::Normal);
    }

    #[test]
    fn edit_touches_only_the_named_metric() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
        let before = default_health_metrics(t0);

        let after = edit_metric_value(&before, BLOOD_PRESSURE, "145/92", t1);

        assert_eq!(after.len(), before.len());
        assert_eq!(after[0].value, "145/92");
        assert_eq!(after[0].status, MetricStatus::Danger);
        assert_eq!(after[0].timestamp, t1);
        assert_eq!(after[1..], before[1..]);
    }

    #[test]
    fn record_reading_clamps_and_rejects_unknown_names() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let before = default_health_metrics(t0);

        let after = record_reading(&before, HEART_RATE, 140.0, t0).unwrap();
        assert_eq!(after[1].progress, 100.0);

        assert!(record_reading(&before, "Weight", 50.0, t0).is_none());
    }
}
