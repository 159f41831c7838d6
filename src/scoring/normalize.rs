use crate::dataset::NeighborhoodRecord;

use super::weights::Normalization;

/// Minimum and maximum of one metric over a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        values.fold(
            Bounds {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |acc, v| Bounds {
                min: acc.min.min(v),
                max: acc.max.max(v),
            },
        )
    }

    /// Rescale into `[0, 1]`. A zero-width range maps everything to 1.0 so
    /// the metric keeps contributing.
    pub fn scale(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Per-metric bounds computed over the whole batch at once, so a row's
/// normalized value never depends on where it sits in the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricBounds {
    pub cafe: Bounds,
    pub metro: Bounds,
    pub safety: Bounds,
}

impl MetricBounds {
    pub fn from_records(records: &[NeighborhoodRecord]) -> Self {
        Self {
            cafe: Bounds::of(records.iter().map(|r| r.cafe_count as f64)),
            metro: Bounds::of(records.iter().map(|r| r.metro_proximity)),
            safety: Bounds::of(records.iter().map(|r| r.safety_index)),
        }
    }
}

/// The three metric values of a record after normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricValues {
    pub cafe: f64,
    pub metro: f64,
    pub safety: f64,
}

/// Turns records into the metric values the score formula consumes.
#[derive(Debug, Clone, Copy)]
pub enum Normalizer {
    Identity,
    MinMax(MetricBounds),
}

impl Normalizer {
    pub fn for_batch(mode: Normalization, records: &[NeighborhoodRecord]) -> Self {
        match mode {
            Normalization::None => Normalizer::Identity,
            Normalization::MinMax => Normalizer::MinMax(MetricBounds::from_records(records)),
        }
    }

    pub fn values(&self, record: &NeighborhoodRecord) -> MetricValues {
        let cafe = record.cafe_count as f64;
        match self {
            Normalizer::Identity => MetricValues {
                cafe,
                metro: record.metro_proximity,
                safety: record.safety_index,
            },
            Normalizer::MinMax(bounds) => MetricValues {
                cafe: bounds.cafe.scale(cafe),
                metro: bounds.metro.scale(record.metro_proximity),
                safety: bounds.safety.scale(record.safety_index),
            },
        }
    }
}
