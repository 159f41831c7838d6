use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use super::error::ScoreError;
use super::normalize::Normalizer;
use super::validation::validate_engine_config;
use super::weights::{ScoringOptions, WeightConfig};
use crate::dataset::{GeoPoint, ListingDetails, NeighborhoodRecord, RawNeighborhoodRow};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub label: &'static str, // "Cafes", "Metro", "Safety"
    pub value: f64,          // Metric value after normalization
    pub weight: f64,
    pub weighted: f64, // value * weight, before dividing by rent
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub factors: Vec<FactorContribution>,
    /// Rent after dividing by the rent unit
    pub rent_divisor: f64,
}

impl ScoreBreakdown {
    pub fn numerator(&self) -> f64 {
        self.factors.iter().map(|f| f.weighted).sum()
    }
}

/// A record with its computed value score and 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredNeighborhood {
    pub record: NeighborhoodRecord,
    pub value_score: f64,
    pub rank: usize,
    pub breakdown: ScoreBreakdown,
}

/// Score and rank with raw metrics and rent taken as-is.
pub fn compute_scores(
    records: &[NeighborhoodRecord],
    weights: &WeightConfig,
) -> Result<Vec<ScoredNeighborhood>, ScoreError> {
    compute_scores_with(records, weights, &ScoringOptions::default())
}

/// Score and rank a batch.
///
/// `value_score = (cafe * w_cafe + metro * w_metro + safety * w_safety) / (rent / rent_unit)`,
/// with metrics optionally min-max scaled over the whole batch first.
/// Output is sorted by descending score; see [`rank_order`] for ties.
pub fn compute_scores_with(
    records: &[NeighborhoodRecord],
    weights: &WeightConfig,
    options: &ScoringOptions,
) -> Result<Vec<ScoredNeighborhood>, ScoreError> {
    if records.is_empty() {
        return Err(ScoreError::EmptyDataset);
    }
    validate_engine_config(weights, options)?;
    for (row, record) in records.iter().enumerate() {
        record.validate(row)?;
    }

    let normalizer = Normalizer::for_batch(options.normalization, records);

    let mut scored: Vec<ScoredNeighborhood> = records
        .iter()
        .map(|record| score_record(record, weights, options.rent_unit, &normalizer))
        .collect();

    scored.sort_by(rank_order);
    for (idx, entry) in scored.iter_mut().enumerate() {
        entry.rank = idx + 1;
    }

    debug!(
        records = scored.len(),
        normalization = options.normalization.label(),
        "scored batch"
    );

    Ok(scored)
}

/// Convert boundary rows and score them in one call.
pub fn score_rows(
    rows: Vec<RawNeighborhoodRow>,
    weights: &WeightConfig,
    options: &ScoringOptions,
) -> Result<Vec<ScoredNeighborhood>, ScoreError> {
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(row, raw)| raw.into_record(row))
        .collect::<Result<Vec<_>, _>>()?;
    compute_scores_with(&records, weights, options)
}

fn score_record(
    record: &NeighborhoodRecord,
    weights: &WeightConfig,
    rent_unit: f64,
    normalizer: &Normalizer,
) -> ScoredNeighborhood {
    let values = normalizer.values(record);
    let factors = vec![
        FactorContribution {
            label: "Cafes",
            value: values.cafe,
            weight: weights.cafe,
            weighted: values.cafe * weights.cafe,
        },
        FactorContribution {
            label: "Metro",
            value: values.metro,
            weight: weights.metro,
            weighted: values.metro * weights.metro,
        },
        FactorContribution {
            label: "Safety",
            value: values.safety,
            weight: weights.safety,
            weighted: values.safety * weights.safety,
        },
    ];
    let breakdown = ScoreBreakdown {
        factors,
        rent_divisor: record.rent / rent_unit,
    };
    let value_score = breakdown.numerator() / breakdown.rent_divisor;

    ScoredNeighborhood {
        record: record.clone(),
        value_score,
        rank: 0,
        breakdown,
    }
}

/// Ranking comparator.
///
/// Primary: score descending. Ties: rent ascending, name ascending, then
/// cafes, metro proximity and safety descending. Location and listing
/// details close the chain, so only fully identical rows compare equal
/// and the order never depends on input order.
pub fn rank_order(a: &ScoredNeighborhood, b: &ScoredNeighborhood) -> Ordering {
    b.value_score
        .total_cmp(&a.value_score)
        .then_with(|| a.record.rent.total_cmp(&b.record.rent))
        .then_with(|| a.record.name.cmp(&b.record.name))
        .then_with(|| b.record.cafe_count.cmp(&a.record.cafe_count))
        .then_with(|| b.record.metro_proximity.total_cmp(&a.record.metro_proximity))
        .then_with(|| b.record.safety_index.total_cmp(&a.record.safety_index))
        .then_with(|| cmp_location(a.record.location, b.record.location))
        .then_with(|| cmp_details(a.record.details.as_ref(), b.record.details.as_ref()))
}

// None sorts first in both helpers.
fn cmp_location(a: Option<GeoPoint>, b: Option<GeoPoint>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a
            .latitude
            .total_cmp(&b.latitude)
            .then_with(|| a.longitude.total_cmp(&b.longitude)),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

fn cmp_details(a: Option<&ListingDetails>, b: Option<&ListingDetails>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a
            .neighborhood
            .cmp(&b.neighborhood)
            .then_with(|| a.bhk.cmp(&b.bhk))
            .then_with(|| a.size_sqft.cmp(&b.size_sqft))
            .then_with(|| a.posted_on.cmp(&b.posted_on))
            .then_with(|| a.furnishing.cmp(&b.furnishing))
            .then_with(|| match (a.metro_distance_km, b.metro_distance_km) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (x, y) => x.is_some().cmp(&y.is_some()),
            }),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}
