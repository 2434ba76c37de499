//! boxwhisker-stats - Statistics for box-and-whisker plots
//!
//! This crate turns per-group numeric arrays into immutable box summaries:
//!
//! - **Quantiles**: linear-interpolation (R-7) estimator over sorted data
//! - **QuantileConfig**: validated whisker and quartile probabilities
//! - **Strategies**: pluggable whisker and quartile functions
//! - **GroupSummary**: quartiles, whiskers, mean, extremes and outliers
//!
//! # Outlier Policy
//!
//! Outliers come from two independent rules that are OR-combined: an
//! index walk from both ends of the sorted data against the whiskers widened
//! by `outlier_factor * IQR`, and a plain value test against the whiskers.
//! A point caught by both rules appears twice in [`GroupSummary::outliers`].

pub mod config;
pub mod error;
pub mod quantile;
pub mod strategy;
pub mod summary;

pub use config::*;
pub use error::*;
pub use quantile::*;
pub use strategy::*;
pub use summary::*;

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
