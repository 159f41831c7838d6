pub mod aggregate;
pub mod error;
pub mod filter;
pub mod house_rent;
pub mod loader;
pub mod locality;
pub mod source;
pub mod types;

pub use aggregate::aggregate_by_neighborhood;
pub use error::DatasetError;
pub use filter::ListingFilter;
pub use house_rent::{import_house_rent, ImportOptions, ImportReport};
pub use loader::load_neighborhoods;
pub use source::{DatasetConfig, DatasetFormat};
pub use types::{GeoPoint, ListingDetails, NeighborhoodRecord, RawNeighborhoodRow};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

/// Read-only neighborhood table, loaded once and shared.
///
/// Cloning shares the rows; nothing mutates them after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[NeighborhoodRecord]>,
    origin: Option<PathBuf>,
    /// Rows the importer dropped (other city, unknown locality, unreadable)
    pub dropped: usize,
}

impl Dataset {
    pub fn new(records: Vec<NeighborhoodRecord>) -> Self {
        Self {
            records: records.into(),
            origin: None,
            dropped: 0,
        }
    }

    pub fn records(&self) -> &[NeighborhoodRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// One record per neighborhood, see [`aggregate_by_neighborhood`].
    pub fn aggregated(&self) -> Dataset {
        Dataset {
            records: aggregate_by_neighborhood(&self.records).into(),
            origin: self.origin.clone(),
            dropped: self.dropped,
        }
    }

    /// Load the dataset described by `config` from `path`.
    pub fn load(path: &Path, config: &DatasetConfig) -> Result<Dataset, DatasetError> {
        let mut dataset = match config.format {
            DatasetFormat::Neighborhoods => Dataset::new(load_neighborhoods(path)?),
            DatasetFormat::HouseRent => {
                let report = import_house_rent(path, &config.import_options())?;
                let dropped = report.other_city + report.unknown_locality + report.invalid;
                if report.invalid > 0 {
                    warn!(
                        path = %path.display(),
                        invalid = report.invalid,
                        "skipped unreadable listings"
                    );
                }
                let mut dataset = Dataset::new(report.records);
                dataset.dropped = dropped;
                dataset
            }
        };
        dataset.origin = Some(path.to_path_buf());

        if config.aggregate {
            dataset = dataset.aggregated();
        }
        Ok(dataset)
    }
}
