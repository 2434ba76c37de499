//! Error types for boxwhisker-core
//!
//! Every error is terminal for the render cycle that raised it only. The
//! chart keeps no partial state behind, and each failed cycle surfaces exactly
//! one [`ChartWarning`] for the host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use boxwhisker_stats::StatsError;

/// Main error type for a render cycle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// Quantile probabilities are out of range or out of order
    #[error("Invalid configuration: {0}")]
    Config(#[from] StatsError),

    /// The host table is malformed or holds a non-numeric observation
    #[error("Invalid data: {0}")]
    Data(#[from] DataError),

    /// Scale derivation failed
    #[error("Scale error: {0}")]
    Scale(#[from] ScaleError),

    /// Settings could not be loaded
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Errors raised while extracting observations from host input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// A value failed numeric parsing
    #[error("Non-numeric value {value:?} in series {group_key} at row {row}")]
    NonNumeric {
        group_key: i64,
        row: usize,
        value: String,
    },

    /// A series column has more rows than there are categories
    #[error("Series {group_key} has {rows} rows but only {categories} categories")]
    RowMismatch {
        group_key: i64,
        rows: usize,
        categories: usize,
    },

    /// Two category rows share a label
    #[error("Category {label:?} appears at rows {first} and {second}")]
    DuplicateCategory {
        label: String,
        first: usize,
        second: usize,
    },
}

/// Errors raised by the scale calculator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    /// No groups to derive a scale from
    #[error("Cannot derive a scale from an empty dataset")]
    EmptyDataset,
}

/// Result type alias for chart operations
pub type ChartResult<T> = Result<T, ChartError>;

/// Result type alias for data extraction
pub type DataResult<T> = Result<T, DataError>;

/// Result type alias for scale derivation
pub type ScaleResult<T> = Result<T, ScaleError>;

/// Warning shown to the host when a cycle is rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartWarning {
    /// Stable warning code
    pub code: String,
    /// Short title
    pub title: String,
    /// User-facing message
    pub message: String,
    /// Technical detail
    pub detail: String,
}

impl ChartError {
    /// Warning describing this error
    pub fn warning(&self) -> ChartWarning {
        match self {
            ChartError::Config(err) => ChartWarning {
                code: "UnexpectedValueType".to_string(),
                title: "Invalid Quantile Multiplier".to_string(),
                message: "Quantiles need to be between 0 and 1 and in increasing order from 1st to 4th"
                    .to_string(),
                detail: err.to_string(),
            },
            ChartError::Data(err @ DataError::DuplicateCategory { .. }) => ChartWarning {
                code: "DuplicateCategory".to_string(),
                title: "Duplicate Category".to_string(),
                message: "Category labels need to be unique".to_string(),
                detail: err.to_string(),
            },
            ChartError::Data(err) => ChartWarning {
                code: "NaNNotSupported".to_string(),
                title: "Invalid Data".to_string(),
                message: "The dataset contains values that are not numbers".to_string(),
                detail: err.to_string(),
            },
            ChartError::Scale(err) => ChartWarning {
                code: "ScaleUnavailable".to_string(),
                title: "Nothing To Draw".to_string(),
                message: "No group has enough data to draw".to_string(),
                detail: err.to_string(),
            },
            ChartError::Settings(msg) => ChartWarning {
                code: "InvalidSettings".to_string(),
                title: "Invalid Settings".to_string(),
                message: "The chart settings could not be read".to_string(),
                detail: msg.clone(),
            },
        }
    }
}
