use serde::{Deserialize, Serialize};

/// Relative importance of each contributing metric.
///
/// A fresh value is built for every scoring call; the engine only ever
/// borrows it.
///
/// Example YAML:
/// ```yaml
/// weights:
///   cafe: 0.5
///   metro: 0.8
///   safety: 0.5
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightConfig {
    /// Weight of cafe density (`w_cafe`)
    #[serde(default)]
    pub cafe: f64,

    /// Weight of metro proximity (`w_metro`)
    #[serde(default)]
    pub metro: f64,

    /// Weight of the safety index (`w_safety`)
    #[serde(default)]
    pub safety: f64,
}

impl WeightConfig {
    pub fn new(cafe: f64, metro: f64, safety: f64) -> Self {
        Self {
            cafe,
            metro,
            safety,
        }
    }

    /// Named weights in a fixed order, for validation and display.
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [
            ("weights.cafe", self.cafe),
            ("weights.metro", self.metro),
            ("weights.safety", self.safety),
        ]
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            cafe: 0.5,
            metro: 0.8,
            safety: 0.5,
        }
    }
}

/// How metrics are rescaled before weighting.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// Use raw metric values.
    #[default]
    None,
    /// Rescale each metric to `[0, 1]` over the whole batch.
    MinMax,
}

impl Normalization {
    pub fn label(&self) -> &'static str {
        match self {
            Normalization::None => "raw",
            Normalization::MinMax => "min-max",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Normalization::None => Normalization::MinMax,
            Normalization::MinMax => Normalization::None,
        }
    }
}

/// Optional engine behaviours.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringOptions {
    #[serde(default)]
    pub normalization: Normalization,

    /// Rent is divided by this before scoring (1000 reads as "per thousand").
    #[serde(default = "default_rent_unit")]
    pub rent_unit: f64,
}

fn default_rent_unit() -> f64 {
    1.0
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            normalization: Normalization::None,
            rent_unit: default_rent_unit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightConfig::default();
        assert_eq!(weights.cafe, 0.5);
        assert_eq!(weights.metro, 0.8);
        assert_eq!(weights.safety, 0.5);
    }

    #[test]
    fn test_weights_serde_roundtrip() {
        let weights = WeightConfig::new(0.25, 1.0, 0.75);
        let yaml = serde_saphyr::to_string(&weights).unwrap();
        let parsed: WeightConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(weights, parsed);
    }

    #[test]
    fn test_partial_weights_parse() {
        let yaml = "cafe: 2\n";
        let weights: WeightConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(weights.cafe, 2.0);
        assert_eq!(weights.metro, 0.0);
        assert_eq!(weights.safety, 0.0);
    }

    #[test]
    fn test_unknown_weight_rejected() {
        let yaml = "cafe: 1\nparks: 1\n";
        let result: Result<WeightConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_scoring_options_parse() {
        let yaml = "normalization: min-max\nrent_unit: 1000\n";
        let options: ScoringOptions = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(options.normalization, Normalization::MinMax);
        assert_eq!(options.rent_unit, 1000.0);
    }

    #[test]
    fn test_scoring_options_defaults() {
        let options: ScoringOptions = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(options, ScoringOptions::default());
    }

    #[test]
    fn test_normalization_toggle() {
        assert_eq!(Normalization::None.toggled(), Normalization::MinMax);
        assert_eq!(Normalization::MinMax.toggled(), Normalization::None);
    }
}
