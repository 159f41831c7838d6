use tracing::debug;

use crate::dataset::{Dataset, ListingFilter};
use crate::scoring::{compute_scores_with, ScoreError, ScoredNeighborhood, ScoringOptions, WeightConfig};

/// Everything one ranking call needs besides the dataset.
///
/// Built fresh from the current slider/flag values on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RankRequest {
    pub weights: WeightConfig,
    pub options: ScoringOptions,
    pub filter: ListingFilter,
}

/// Ranked output plus how much of the dataset the filters removed.
#[derive(Debug, Clone)]
pub struct Ranking {
    pub entries: Vec<ScoredNeighborhood>,
    pub total: usize,
    pub filtered_out: usize,
}

impl Ranking {
    pub fn top(&self) -> Option<&ScoredNeighborhood> {
        self.entries.first()
    }
}

/// Filter the dataset, then score and rank what is left.
///
/// Normalization bounds are computed over the filtered batch. An empty
/// filtered batch is reported as [`ScoreError::EmptyDataset`].
pub fn rank(dataset: &Dataset, request: &RankRequest) -> Result<Ranking, ScoreError> {
    let total = dataset.len();
    let candidates = if request.filter.is_empty() {
        dataset.records().to_vec()
    } else {
        request.filter.apply(dataset.records())
    };
    let filtered_out = total - candidates.len();

    debug!(total, filtered_out, "ranking candidates");

    let entries = compute_scores_with(&candidates, &request.weights, &request.options)?;
    Ok(Ranking {
        entries,
        total,
        filtered_out,
    })
}

/// Message shown when filters leave nothing to rank.
pub fn no_match_hint(filter: &ListingFilter) -> String {
    match (filter.max_rent, filter.min_safety) {
        (Some(budget), Some(safety)) => format!(
            "No neighborhoods found under ₹{} with Safety Score >= {}. Try increasing your budget.",
            budget, safety
        ),
        (Some(budget), None) => format!(
            "No neighborhoods found under ₹{}. Try increasing your budget.",
            budget
        ),
        (None, Some(safety)) => format!(
            "No neighborhoods found with Safety Score >= {}. Try lowering the minimum.",
            safety
        ),
        (None, None) => "The dataset has no neighborhoods to rank.".to_string(),
    }
}
