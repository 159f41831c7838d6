use serde::{Deserialize, Serialize};

use crate::dataset::{DatasetConfig, ListingFilter};
use crate::pipeline::RankRequest;
use crate::scoring::{ScoringOptions, WeightConfig};

/// Contents of `config.yaml`. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub weights: WeightConfig,

    #[serde(default)]
    pub filters: ListingFilter,

    #[serde(default)]
    pub scoring: ScoringOptions,
}

impl Config {
    /// Starting request for a ranking call, before any CLI or slider overrides.
    pub fn rank_request(&self) -> RankRequest {
        RankRequest {
            weights: self.weights,
            options: self.scoring,
            filter: self.filters,
        }
    }
}
