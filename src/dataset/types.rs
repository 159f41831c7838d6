use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scoring::ScoreError;

/// Upper bound of the safety scale (the dashboard slider runs 1-10).
pub const SAFETY_INDEX_MAX: f64 = 10.0;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Extra listing attributes carried through scoring untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingDetails {
    /// Canonical neighborhood the listing was geocoded to
    pub neighborhood: Option<String>,
    pub bhk: Option<u32>,
    pub size_sqft: Option<u32>,
    pub posted_on: Option<NaiveDate>,
    pub furnishing: Option<String>,
    pub metro_distance_km: Option<f64>,
}

/// One validated input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodRecord {
    pub name: String,
    pub rent: f64,
    pub cafe_count: u32,
    /// Higher is closer.
    pub metro_proximity: f64,
    pub safety_index: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ListingDetails>,
}

impl NeighborhoodRecord {
    pub fn new(
        name: impl Into<String>,
        rent: f64,
        cafe_count: u32,
        metro_proximity: f64,
        safety_index: f64,
    ) -> Self {
        Self {
            name: name.into(),
            rent,
            cafe_count,
            metro_proximity,
            safety_index,
            location: None,
            details: None,
        }
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_details(mut self, details: ListingDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Key used to group listings into neighborhoods.
    pub fn neighborhood(&self) -> &str {
        self.details
            .as_ref()
            .and_then(|d| d.neighborhood.as_deref())
            .unwrap_or(&self.name)
    }

    /// Check every numeric attribute against its domain.
    ///
    /// `row` is the record's position in the batch, used in the error.
    pub fn validate(&self, row: usize) -> Result<(), ScoreError> {
        let domain = |field: &'static str, value: f64, reason: &'static str| ScoreError::Domain {
            row,
            name: self.name.clone(),
            field,
            value,
            reason,
        };

        if !self.rent.is_finite() || self.rent <= 0.0 {
            return Err(domain("rent", self.rent, "must be a finite value greater than zero"));
        }
        if !self.metro_proximity.is_finite() || self.metro_proximity < 0.0 {
            return Err(domain(
                "metro_proximity",
                self.metro_proximity,
                "must be a finite non-negative value",
            ));
        }
        if !self.safety_index.is_finite()
            || self.safety_index < 0.0
            || self.safety_index > SAFETY_INDEX_MAX
        {
            return Err(domain("safety_index", self.safety_index, "must be between 0 and 10"));
        }
        Ok(())
    }
}

/// Untyped boundary row: every column optional, as a loader hands it over.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawNeighborhoodRow {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rent: Option<f64>,
    #[serde(default)]
    pub cafe_count: Option<f64>,
    #[serde(default)]
    pub metro_proximity: Option<f64>,
    #[serde(default)]
    pub metro_distance_km: Option<f64>,
    #[serde(default)]
    pub safety_index: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Convert a metro distance into the "higher is closer" proximity measure.
///
/// Mirrors the dashboard's `1 / distance * 100`.
pub fn proximity_from_distance_km(distance_km: f64) -> f64 {
    100.0 / distance_km
}

impl RawNeighborhoodRow {
    /// Validate and convert into a typed record.
    ///
    /// `metro_proximity` may be omitted when `metro_distance_km` is given.
    pub fn into_record(self, row: usize) -> Result<NeighborhoodRecord, ScoreError> {
        let missing = |field: &'static str| ScoreError::MissingField { row, field };

        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| missing("name"))?;
        let rent = self.rent.ok_or_else(|| missing("rent"))?;
        let cafes = self.cafe_count.ok_or_else(|| missing("cafe_count"))?;
        let safety_index = self.safety_index.ok_or_else(|| missing("safety_index"))?;

        let domain = |field: &'static str, value: f64, reason: &'static str| ScoreError::Domain {
            row,
            name: name.clone(),
            field,
            value,
            reason,
        };

        let metro_proximity = match (self.metro_proximity, self.metro_distance_km) {
            (Some(p), _) => p,
            (None, Some(d)) if d.is_finite() && d > 0.0 => proximity_from_distance_km(d),
            (None, Some(d)) => {
                return Err(domain(
                    "metro_distance_km",
                    d,
                    "must be a finite value greater than zero",
                ))
            }
            (None, None) => return Err(missing("metro_proximity")),
        };

        if !cafes.is_finite() || cafes < 0.0 || cafes.fract() != 0.0 || cafes > u32::MAX as f64 {
            return Err(domain("cafe_count", cafes, "must be a non-negative integer"));
        }

        let location = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            (None, None) => None,
            (Some(_), None) => return Err(missing("longitude")),
            (None, Some(_)) => return Err(missing("latitude")),
        };

        let details = self.metro_distance_km.map(|d| ListingDetails {
            metro_distance_km: Some(d),
            ..ListingDetails::default()
        });

        let record = NeighborhoodRecord {
            name,
            rent,
            cafe_count: cafes as u32,
            metro_proximity,
            safety_index,
            location,
            details,
        };
        record.validate(row)?;
        Ok(record)
    }
}
