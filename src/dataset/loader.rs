use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::error::DatasetError;
use super::types::{NeighborhoodRecord, RawNeighborhoodRow};

/// Load a neighborhood CSV.
///
/// Expected headers: `name, rent, cafe_count, metro_proximity, safety_index`,
/// with `metro_distance_km` accepted in place of `metro_proximity` and
/// optional `latitude, longitude`. Any row failing validation aborts the
/// load; error rows are numbered from 1 (first data line).
pub fn load_neighborhoods(path: &Path) -> Result<Vec<NeighborhoodRecord>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_neighborhoods(file, path)?;
    debug!(path = %path.display(), rows = records.len(), "loaded neighborhoods");
    Ok(records)
}

/// Parse neighborhood rows from any reader. `origin` is only used in errors.
pub fn read_neighborhoods<R: Read>(
    reader: R,
    origin: &Path,
) -> Result<Vec<NeighborhoodRecord>, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers().map_err(|source| DatasetError::Csv {
        path: origin.to_path_buf(),
        source,
    })?;
    if !headers.iter().any(|h| h == "name") {
        return Err(DatasetError::MissingColumn {
            path: origin.to_path_buf(),
            column: "name",
        });
    }

    let mut records = Vec::new();
    for (idx, result) in rdr.deserialize::<RawNeighborhoodRow>().enumerate() {
        let raw = result.map_err(|source| DatasetError::Csv {
            path: origin.to_path_buf(),
            source,
        })?;
        let record = raw.into_record(idx).map_err(|e| DatasetError::Row {
            path: origin.to_path_buf(),
            source: e.offset_row(1),
        })?;
        records.push(record);
    }
    Ok(records)
}
