//! Fixed coordinate table for the Bangalore localities the importer knows.

use super::types::GeoPoint;

/// Known localities and their approximate centre.
pub const BANGALORE_LOCALITIES: [(&str, f64, f64); 14] = [
    ("Koramangala", 12.9345, 77.6186),
    ("HSR Layout", 12.9121, 77.6446),
    ("Whitefield", 12.9698, 77.7500),
    ("Indiranagar", 12.9784, 77.6408),
    ("Jayanagar", 12.9304, 77.5855),
    ("Marathahalli", 12.9591, 77.6974),
    ("Electronic City", 12.8399, 77.6770),
    ("BTM Layout", 12.9166, 77.6101),
    ("Hebbal", 13.0354, 77.5988),
    ("Yelahanka", 13.1007, 77.5963),
    ("Bellandur", 12.9260, 77.6762),
    ("Sarjapur", 12.9237, 77.6546),
    ("Basavanagudi", 12.9438, 77.5755),
    ("Malleswaram", 13.0031, 77.5643),
];

/// A locality matched from free-form area text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Locality {
    pub name: &'static str,
    pub center: GeoPoint,
}

/// Find the first known locality whose name appears in `area_text`
/// (case-insensitive). Table order decides between multiple matches.
pub fn locate(area_text: &str) -> Option<Locality> {
    let haystack = area_text.to_lowercase();
    BANGALORE_LOCALITIES
        .iter()
        .find(|(name, _, _)| haystack.contains(&name.to_lowercase()))
        .map(|&(name, lat, lon)| Locality {
            name,
            center: GeoPoint::new(lat, lon),
        })
}
