//! Simulated pill identification.
//!
//! No image is inspected. "Analysis" draws a random one- or two-record
//! subset of a three-pill reference catalog; text search filters the same
//! catalog by name and description.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A reference pill record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillRecord {
    pub name: String,
    pub description: String,
    pub dosage: String,
    pub warnings: Vec<String>,
    pub uses: Vec<String>,
    pub side_effects: Vec<String>,
    /// Match confidence, 0–100.
    pub confidence: u8,
}

/// Coarse confidence bucket used for badge colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn of(confidence: u8) -> Self {
        match confidence {
            90.. => ConfidenceBand::High,
            70..=89 => ConfidenceBand::Medium,
            _ => ConfidenceBand::Low,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The reference catalog.
pub fn catalog() -> Vec<PillRecord> {
    vec![
        PillRecord {
            name: "Aspirin 81mg".to_string(),
            description: "Low-dose aspirin, white round tablet".to_string(),
            dosage: "81mg daily".to_string(),
            warnings: strings(&["Do not take with blood thinners", "Consult doctor if pregnant"]),
            uses: strings(&["Heart attack prevention", "Blood clot prevention", "Pain relief"]),
            side_effects: strings(&["Stomach upset", "Nausea", "Increased bleeding risk"]),
            confidence: 95,
        },
        PillRecord {
            name: "Metformin 500mg".to_string(),
            description: "White oval tablet for diabetes management".to_string(),
            dosage: "500mg twice daily with meals".to_string(),
            warnings: strings(&["Take with food", "Monitor kidney function", "Stop before surgery"]),
            uses: strings(&["Type 2 diabetes management", "Blood sugar control", "PCOS treatment"]),
            side_effects: strings(&["Diarrhea", "Nausea", "Metallic taste", "Vitamin B12 deficiency"]),
            confidence: 88,
        },
        PillRecord {
            name: "Lisinopril 10mg".to_string(),
            description: "Light pink round tablet for blood pressure".to_string(),
            dosage: "10mg once daily".to_string(),
            warnings: strings(&["May cause dizziness", "Avoid potassium supplements", "Monitor blood pressure"]),
            uses: strings(&["High blood pressure", "Heart failure", "Kidney protection"]),
            side_effects: strings(&["Dry cough", "Dizziness", "Fatigue", "Elevated potassium"]),
            confidence: 92,
        },
    ]
}

/// Pretend to analyse a photo: one or two distinct catalog records in
/// random order.
pub fn analyze<R: Rng + ?Sized>(rng: &mut R) -> Vec<PillRecord> {
    let mut records = catalog();
    records.shuffle(rng);
    let count = rng.gen_range(1..=2);
    records.truncate(count);
    records
}

/// Case-insensitive substring search over name and description.
///
/// A blank query is a no-op and returns `None`; otherwise the (possibly
/// empty) list of matches.
pub fn search(query: &str) -> Option<Vec<PillRecord>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    Some(
        catalog()
            .into_iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn analysis_returns_one_or_two_distinct_records() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let results = analyze(&mut rng);
            assert!((1..=2).contains(&results.len()));
            let names: HashSet<&str> = results.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names.len(), results.len());
        }
    }

    #[test]
    fn search_matches_name_or_description() {
        let by_name = search("metformin").unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Metformin 500mg");

        let by_description = search("ROUND tablet").unwrap();
        assert_eq!(by_description.len(), 2);

        assert!(search("ibuprofen").unwrap().is_empty());
    }

    #[test]
    fn blank_search_is_a_no_op() {
        assert!(search("   ").is_none());
    }

    #[test]
    fn confidence_bands() {
        assert_eq!(ConfidenceBand::of(95), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::of(88), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::of(40), ConfidenceBand::Low);
    }
}
