//! Property-based tests for the scoring engine.
//!
//! # Invariants tested
//!
//! - **Determinism:** identical inputs give identical ranked output.
//! - **Reorder invariance:** permuting the input never changes scores or order,
//!   even for rows that differ only in location.
//! - **Monotonicity:** raising the safety weight never lowers the safest
//!   record's rank among records with equal rent.
//! - **Rent sensitivity:** lower rent strictly wins when everything else is equal.
//! - **Normalization range:** min-max values stay within `[0, 1]`.

use proptest::prelude::*;

use super::{compute_scores, compute_scores_with, Normalization, Normalizer, ScoringOptions, WeightConfig};
use crate::dataset::{GeoPoint, NeighborhoodRecord};

const NAMES: [&str; 5] = ["Hebbal", "Jayanagar", "Koramangala", "Whitefield", "Yelahanka"];
const SPOTS: [(f64, f64); 3] = [(13.03, 77.59), (13.04, 77.60), (12.93, 77.58)];

fn record_strategy() -> impl Strategy<Value = NeighborhoodRecord> {
    (
        prop::sample::select(NAMES.to_vec()),
        1_000u32..100_000,
        0u32..60,
        0.0f64..100.0,
        0.0f64..=10.0,
        prop::option::of(prop::sample::select(SPOTS.to_vec())),
    )
        .prop_map(|(name, rent, cafes, metro, safety, spot)| {
            let record = NeighborhoodRecord::new(name, rent as f64, cafes, metro, safety);
            match spot {
                Some((lat, lon)) => record.with_location(GeoPoint::new(lat, lon)),
                None => record,
            }
        })
}

/// Records that differ only in location must still rank the same way
/// whatever order they arrive in.
fn twin_records_strategy() -> impl Strategy<Value = Vec<NeighborhoodRecord>> {
    (
        prop::sample::select(NAMES.to_vec()),
        1_000u32..100_000,
        0u32..60,
        prop::collection::vec(prop::option::of(prop::sample::select(SPOTS.to_vec())), 2..6),
    )
        .prop_map(|(name, rent, cafes, spots)| {
            spots
                .into_iter()
                .map(|spot| {
                    let record = NeighborhoodRecord::new(name, rent as f64, cafes, 5.0, 8.0);
                    match spot {
                        Some((lat, lon)) => record.with_location(GeoPoint::new(lat, lon)),
                        None => record,
                    }
                })
                .collect()
        })
}

fn records_strategy() -> impl Strategy<Value = Vec<NeighborhoodRecord>> {
    prop::collection::vec(record_strategy(), 1..25)
}

fn weights_strategy() -> impl Strategy<Value = WeightConfig> {
    (0.0f64..2.0, 0.0f64..2.0, 0.0f64..2.0).prop_map(|(c, m, s)| WeightConfig::new(c, m, s))
}

fn options_strategy() -> impl Strategy<Value = ScoringOptions> {
    (prop::bool::ANY, prop::sample::select(vec![1.0, 1000.0])).prop_map(|(minmax, rent_unit)| {
        ScoringOptions {
            normalization: if minmax {
                Normalization::MinMax
            } else {
                Normalization::None
            },
            rent_unit,
        }
    })
}

/// Quarter steps keep the arithmetic exact so rank comparisons are not
/// disturbed by rounding.
fn quarter() -> impl Strategy<Value = f64> {
    (0u32..8).prop_map(|k| k as f64 * 0.25)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_scoring_is_deterministic(
        records in records_strategy(),
        weights in weights_strategy(),
        options in options_strategy(),
    ) {
        let first = compute_scores_with(&records, &weights, &options).unwrap();
        let second = compute_scores_with(&records, &weights, &options).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_order_does_not_depend_on_input_order(
        (records, shuffled) in records_strategy()
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
        weights in weights_strategy(),
        options in options_strategy(),
    ) {
        let original = compute_scores_with(&records, &weights, &options).unwrap();
        let permuted = compute_scores_with(&shuffled, &weights, &options).unwrap();
        prop_assert_eq!(original, permuted);
    }

    #[test]
    fn prop_location_twins_do_not_depend_on_input_order(
        (records, shuffled) in twin_records_strategy()
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
        weights in weights_strategy(),
    ) {
        let original = compute_scores(&records, &weights).unwrap();
        let permuted = compute_scores(&shuffled, &weights).unwrap();
        prop_assert_eq!(original, permuted);
    }

    #[test]
    fn prop_raising_safety_weight_never_demotes_safest(
        rent in 1_000u32..100_000,
        metrics in prop::collection::vec((0u32..20, 0u32..20, 0u32..=10), 2..12),
        cafe_w in quarter(),
        metro_w in quarter(),
        safety_w in quarter(),
        bump in (1u32..8).prop_map(|k| k as f64 * 0.25),
    ) {
        let records: Vec<NeighborhoodRecord> = metrics
            .iter()
            .enumerate()
            .map(|(i, (c, m, s))| {
                NeighborhoodRecord::new(format!("N{:02}", i), rent as f64, *c, *m as f64, *s as f64)
            })
            .collect();

        let before = compute_scores(&records, &WeightConfig::new(cafe_w, metro_w, safety_w)).unwrap();
        let top_safety = records.iter().map(|r| r.safety_index).fold(f64::MIN, f64::max);
        let safest = before
            .iter()
            .find(|s| s.record.safety_index == top_safety)
            .map(|s| s.record.name.clone())
            .unwrap();

        let after = compute_scores(&records, &WeightConfig::new(cafe_w, metro_w, safety_w + bump)).unwrap();
        let rank_of = |list: &[crate::scoring::ScoredNeighborhood]| {
            list.iter().find(|s| s.record.name == safest).map(|s| s.rank).unwrap()
        };
        prop_assert!(rank_of(&after) <= rank_of(&before));
    }

    #[test]
    fn prop_lower_rent_scores_strictly_higher(
        cafes in 1u32..60,
        metro in 1.0f64..100.0,
        safety in 1.0f64..=10.0,
        cheap in 1_000u32..50_000,
        extra in 1u32..50_000,
        weights in (0.01f64..2.0, 0.01f64..2.0, 0.01f64..2.0)
            .prop_map(|(c, m, s)| WeightConfig::new(c, m, s)),
    ) {
        let records = vec![
            NeighborhoodRecord::new("Pricey", (cheap + extra) as f64, cafes, metro, safety),
            NeighborhoodRecord::new("Cheap", cheap as f64, cafes, metro, safety),
        ];
        let result = compute_scores(&records, &weights).unwrap();
        prop_assert_eq!(result[0].record.name.as_str(), "Cheap");
        prop_assert!(result[0].value_score > result[1].value_score);
    }

    #[test]
    fn prop_min_max_values_in_unit_range(records in records_strategy()) {
        let normalizer = Normalizer::for_batch(Normalization::MinMax, &records);
        for record in &records {
            let v = normalizer.values(record);
            for value in [v.cafe, v.metro, v.safety] {
                prop_assert!((0.0..=1.0).contains(&value));
            }
        }
    }
}
