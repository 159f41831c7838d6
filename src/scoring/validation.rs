use super::error::ScoreError;
use super::weights::{ScoringOptions, WeightConfig};

fn check_weight(setting: &'static str, value: f64) -> Result<(), ScoreError> {
    if value.is_nan() {
        Err(ScoreError::InvalidConfig {
            setting,
            value,
            reason: "must be a number",
        })
    } else if value < 0.0 {
        Err(ScoreError::InvalidConfig {
            setting,
            value,
            reason: "must be non-negative",
        })
    } else if value.is_infinite() {
        Err(ScoreError::InvalidConfig {
            setting,
            value,
            reason: "must be finite",
        })
    } else {
        Ok(())
    }
}

fn check_rent_unit(value: f64) -> Result<(), ScoreError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScoreError::InvalidConfig {
            setting: "scoring.rent_unit",
            value,
            reason: "must be a finite value greater than zero",
        })
    }
}

/// Engine-side check, stopping at the first problem.
pub fn validate_engine_config(
    weights: &WeightConfig,
    options: &ScoringOptions,
) -> Result<(), ScoreError> {
    for (setting, value) in weights.entries() {
        check_weight(setting, value)?;
    }
    check_rent_unit(options.rent_unit)
}

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(weights: &WeightConfig, options: &ScoringOptions) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = weights
        .entries()
        .into_iter()
        .filter_map(|(setting, value)| check_weight(setting, value).err())
        .map(|e| e.to_string())
        .collect();

    if let Err(e) = check_rent_unit(options.rent_unit) {
        errors.push(e.to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
