pub mod engine;
pub mod error;
pub mod normalize;
pub mod validation;
pub mod weights;

#[cfg(test)]
mod properties;

pub use engine::{
    compute_scores, compute_scores_with, rank_order, score_rows, FactorContribution,
    ScoreBreakdown, ScoredNeighborhood,
};
pub use error::ScoreError;
pub use normalize::{MetricBounds, Normalizer};
pub use validation::{validate_engine_config, validate_scoring};
pub use weights::{Normalization, ScoringOptions, WeightConfig};
