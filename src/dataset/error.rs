use std::path::PathBuf;

use thiserror::Error;

use crate::scoring::ScoreError;

/// Errors raised while loading a dataset from disk.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be opened.
    #[error("failed to open dataset at {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed (bad header, malformed line, ...).
    #[error("failed to read CSV in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header.
    #[error("{path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },

    /// A row failed validation.
    #[error("invalid row in {path}")]
    Row {
        path: PathBuf,
        #[source]
        source: ScoreError,
    },
}
