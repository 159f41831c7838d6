//! Errors raised by the scoring engine.

use thiserror::Error;

/// Errors raised synchronously by [`compute_scores`](super::compute_scores)
/// and the boundary conversions that feed it.
///
/// Rows are identified by their 0-based position in the batch handed to the
/// engine, plus the record name when one is known.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// No records were supplied.
    #[error("dataset is empty: nothing to score")]
    EmptyDataset,

    /// A record carries a value outside its domain (e.g. non-positive rent).
    #[error("row {row} ('{name}'): {field} = {value} is invalid - {reason}")]
    Domain {
        row: usize,
        name: String,
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A weight or scoring option is negative, NaN or infinite.
    #[error("invalid scoring config: {setting} = {value} - {reason}")]
    InvalidConfig {
        setting: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A required attribute is absent on a raw row.
    #[error("row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },
}

impl ScoreError {
    /// Shift the row index of row-scoped errors.
    ///
    /// Used by loaders that report positions relative to the source file
    /// rather than to the batch.
    pub fn offset_row(self, by: usize) -> Self {
        match self {
            ScoreError::Domain {
                row,
                name,
                field,
                value,
                reason,
            } => ScoreError::Domain {
                row: row + by,
                name,
                field,
                value,
                reason,
            },
            ScoreError::MissingField { row, field } => ScoreError::MissingField {
                row: row + by,
                field,
            },
            other => other,
        }
    }
}
