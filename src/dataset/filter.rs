use serde::{Deserialize, Serialize};

use super::types::NeighborhoodRecord;

/// Pre-scoring listing filters (the budget and minimum-safety sliders).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ListingFilter {
    /// Keep records with rent at or below this budget
    #[serde(default)]
    pub max_rent: Option<f64>,

    /// Keep records with safety index at or above this value
    #[serde(default)]
    pub min_safety: Option<f64>,
}

impl ListingFilter {
    pub fn matches(&self, record: &NeighborhoodRecord) -> bool {
        self.max_rent.is_none_or(|max| record.rent <= max)
            && self.min_safety.is_none_or(|min| record.safety_index >= min)
    }

    /// Filter records, preserving input order
    pub fn apply(&self, records: &[NeighborhoodRecord]) -> Vec<NeighborhoodRecord> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.max_rent.is_none() && self.min_safety.is_none()
    }
}
