use std::collections::BTreeMap;

use super::types::{GeoPoint, ListingDetails, NeighborhoodRecord};

#[derive(Default)]
struct Accumulator {
    count: usize,
    rent: f64,
    cafes: f64,
    metro: f64,
    safety: f64,
    lat: f64,
    lon: f64,
    located: usize,
    distance_km: f64,
    with_distance: usize,
}

impl Accumulator {
    fn add(&mut self, record: &NeighborhoodRecord) {
        self.count += 1;
        self.rent += record.rent;
        self.cafes += record.cafe_count as f64;
        self.metro += record.metro_proximity;
        self.safety += record.safety_index;
        if let Some(loc) = record.location {
            self.lat += loc.latitude;
            self.lon += loc.longitude;
            self.located += 1;
        }
        if let Some(km) = record.details.as_ref().and_then(|d| d.metro_distance_km) {
            self.distance_km += km;
            self.with_distance += 1;
        }
    }

    fn finish(self, name: String) -> NeighborhoodRecord {
        let n = self.count as f64;
        let mut record = NeighborhoodRecord::new(
            name.clone(),
            self.rent / n,
            (self.cafes / n).round() as u32,
            self.metro / n,
            self.safety / n,
        );
        if self.located > 0 {
            let k = self.located as f64;
            record = record.with_location(GeoPoint::new(self.lat / k, self.lon / k));
        }
        record.with_details(ListingDetails {
            neighborhood: Some(name),
            metro_distance_km: (self.with_distance > 0)
                .then(|| self.distance_km / self.with_distance as f64),
            ..ListingDetails::default()
        })
    }
}

/// Collapse listings into one record per neighborhood.
///
/// Rent, cafes, metro proximity and safety are averaged (cafes rounded to
/// the nearest whole count); location is the centroid of located listings.
/// Output is sorted by neighborhood name.
pub fn aggregate_by_neighborhood(records: &[NeighborhoodRecord]) -> Vec<NeighborhoodRecord> {
    let mut groups: BTreeMap<String, Accumulator> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.neighborhood().to_string())
            .or_default()
            .add(record);
    }
    groups
        .into_iter()
        .map(|(name, acc)| acc.finish(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(area: &str, neighborhood: &str, rent: f64, cafes: u32, safety: f64) -> NeighborhoodRecord {
        NeighborhoodRecord::new(area, rent, cafes, 10.0, safety)
            .with_location(GeoPoint::new(12.9, 77.6))
            .with_details(ListingDetails {
                neighborhood: Some(neighborhood.to_string()),
                metro_distance_km: Some(10.0),
                ..ListingDetails::default()
            })
    }

    #[test]
    fn test_groups_by_neighborhood() {
        let records = vec![
            listing("Koramangala 5th Block", "Koramangala", 20000.0, 10, 8.0),
            listing("Whitefield Main Rd", "Whitefield", 30000.0, 20, 7.0),
            listing("Koramangala 1st Block", "Koramangala", 30000.0, 13, 9.0),
        ];
        let aggregated = aggregate_by_neighborhood(&records);
        assert_eq!(aggregated.len(), 2);

        let kora = &aggregated[0];
        assert_eq!(kora.name, "Koramangala");
        assert_eq!(kora.rent, 25000.0);
        assert_eq!(kora.cafe_count, 12); // 11.5 rounds up
        assert_eq!(kora.safety_index, 8.5);
        assert_eq!(kora.neighborhood(), "Koramangala");
        assert_eq!(
            kora.details.as_ref().unwrap().metro_distance_km,
            Some(10.0)
        );

        assert_eq!(aggregated[1].name, "Whitefield");
    }

    #[test]
    fn test_records_without_details_group_by_name() {
        let records = vec![
            NeighborhoodRecord::new("Hebbal", 10000.0, 4, 2.0, 8.0),
            NeighborhoodRecord::new("Hebbal", 20000.0, 6, 4.0, 6.0),
        ];
        let aggregated = aggregate_by_neighborhood(&records);
        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated[0].rent, 15000.0);
        assert_eq!(aggregated[0].metro_proximity, 3.0);
        assert!(aggregated[0].location.is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_by_neighborhood(&[]).is_empty());
    }
}
