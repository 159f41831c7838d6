use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::house_rent::{ImportOptions, DEFAULT_SEED};

/// Layout of the dataset file.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetFormat {
    /// One row per neighborhood with the scoring columns
    #[default]
    Neighborhoods,
    /// House Rent Dataset listings, geocoded and enriched on import
    HouseRent,
}

/// Where the dataset comes from and how to read it.
///
/// Example YAML:
/// ```yaml
/// dataset:
///   path: House_Rent_Dataset.csv
///   format: house-rent
///   city: Bangalore
///   seed: 42
///   aggregate: true
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    /// Path to the CSV file (relative paths resolve from the working directory)
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub format: DatasetFormat,

    /// City to keep when importing house-rent listings
    #[serde(default = "default_city")]
    pub city: String,

    /// Seed for the simulated lifestyle columns
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Collapse listings into one row per neighborhood before scoring
    #[serde(default)]
    pub aggregate: bool,
}

fn default_city() -> String {
    "Bangalore".to_string()
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: None,
            format: DatasetFormat::default(),
            city: default_city(),
            seed: default_seed(),
            aggregate: false,
        }
    }
}

impl DatasetConfig {
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            city: self.city.clone(),
            seed: self.seed,
        }
    }
}
