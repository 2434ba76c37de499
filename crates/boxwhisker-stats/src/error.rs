//! Error types for boxwhisker-stats

use thiserror::Error;

/// Errors raised while configuring or running the statistics engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// A probability lies outside `[0, 1]` (NaN included)
    #[error("Quantile probability '{name}' must be between 0 and 1, got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    /// Probabilities are not non-decreasing from low whisker to high whisker
    #[error("Quantile probabilities must be non-decreasing: '{lower}' ({lower_value}) > '{upper}' ({upper_value})")]
    ProbabilitiesOutOfOrder {
        lower: &'static str,
        lower_value: f64,
        upper: &'static str,
        upper_value: f64,
    },

    /// The outlier multiplier is not a finite number
    #[error("Outlier factor must be finite, got {0}")]
    InvalidOutlierFactor(f64),
}

/// Result type alias for statistics operations
pub type StatsResult<T> = Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = StatsError::ProbabilityOutOfRange {
            name: "q1",
            value: 1.5,
        };
        assert!(err.to_string().contains("q1"));
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_out_of_order_display() {
        let err = StatsError::ProbabilitiesOutOfOrder {
            lower: "q1",
            lower_value: 0.8,
            upper: "q3",
            upper_value: 0.7,
        };
        let msg = err.to_string();
        assert!(msg.contains("non-decreasing"));
        assert!(msg.contains("0.8"));
    }
}
