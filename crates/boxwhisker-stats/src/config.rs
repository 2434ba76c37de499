//! Quantile configuration for the statistics engine
//!
//! Four probabilities pick the whiskers and the box edges. They must lie in
//! `[0, 1]` and be non-decreasing:
//!
//! ```text
//! low_whisker_prob <= q1_prob <= q3_prob <= high_whisker_prob
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Probabilities and outlier multiplier used to summarize a group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
#[serde(default)]
pub struct QuantileConfig {
    /// Probability of the low whisker
    pub low_whisker_prob: f64,
    /// Probability of the lower box edge
    pub q1_prob: f64,
    /// Probability of the upper box edge
    pub q3_prob: f64,
    /// Probability of the high whisker
    pub high_whisker_prob: f64,
    /// Multiplier of the box height widening the whiskers for the index walk
    pub outlier_factor: f64,
}

impl Default for QuantileConfig {
    fn default() -> Self {
        Self {
            low_whisker_prob: 0.05,
            q1_prob: 0.25,
            q3_prob: 0.75,
            high_whisker_prob: 0.95,
            outlier_factor: 0.0,
        }
    }
}

impl QuantileConfig {
    /// Create a configuration from the four probabilities, in ascending order
    pub fn new(low_whisker: f64, q1: f64, q3: f64, high_whisker: f64) -> Self {
        Self {
            low_whisker_prob: low_whisker,
            q1_prob: q1,
            q3_prob: q3,
            high_whisker_prob: high_whisker,
            outlier_factor: 0.0,
        }
    }

    /// Set the outlier multiplier
    pub fn with_outlier_factor(mut self, factor: f64) -> Self {
        self.outlier_factor = factor;
        self
    }

    /// The probabilities in ascending order, labelled
    fn named_probabilities(&self) -> [(&'static str, f64); 4] {
        [
            ("low_whisker", self.low_whisker_prob),
            ("q1", self.q1_prob),
            ("q3", self.q3_prob),
            ("high_whisker", self.high_whisker_prob),
        ]
    }

    /// Check range and ordering of the probabilities
    pub fn validate(&self) -> StatsResult<()> {
        let named = self.named_probabilities();

        for (name, value) in named {
            if !(0.0..=1.0).contains(&value) {
                return Err(StatsError::ProbabilityOutOfRange { name, value });
            }
        }

        for pair in named.windows(2) {
            let (lower, lower_value) = pair[0];
            let (upper, upper_value) = pair[1];
            if lower_value > upper_value {
                return Err(StatsError::ProbabilitiesOutOfOrder {
                    lower,
                    lower_value,
                    upper,
                    upper_value,
                });
            }
        }

        if !self.outlier_factor.is_finite() {
            return Err(StatsError::InvalidOutlierFactor(self.outlier_factor));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(QuantileConfig::default().validate().is_ok());
    }

    #[test]
    fn test_equal_probabilities_accepted() {
        let config = QuantileConfig::new(0.5, 0.5, 0.5, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reversed_order_rejected() {
        let config = QuantileConfig::new(0.95, 0.75, 0.25, 0.05);
        assert!(matches!(
            config.validate(),
            Err(StatsError::ProbabilitiesOutOfOrder { .. })
        ));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let config = QuantileConfig::new(-0.1, 0.25, 0.75, 0.95);
        assert!(matches!(
            config.validate(),
            Err(StatsError::ProbabilityOutOfRange { name: "low_whisker", .. })
        ));

        let config = QuantileConfig::new(0.05, 0.25, 0.75, 1.01);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let config = QuantileConfig::new(0.05, f64::NAN, 0.75, 0.95);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_infinite_outlier_factor_rejected() {
        let config = QuantileConfig::default().with_outlier_factor(f64::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(StatsError::InvalidOutlierFactor(_))
        ));
    }
}
