//! Group summaries for box-and-whisker plots
//!
//! [`SummaryEngine`] owns a validated [`QuantileConfig`] plus the pluggable
//! strategies and turns one numeric array into one [`GroupSummary`].
//!
//! Two paths are offered:
//! - [`SummaryEngine::summarize_grouped`]: the time-bucketed chart path.
//!   Points are de-duplicated and every statistic comes from the configured
//!   probabilities.
//! - [`SummaryEngine::summarize_points`]: the generic path. Duplicates are
//!   kept and quartiles come from the quartile strategy. Whisker values and
//!   outliers still follow the configured probabilities; the whisker strategy
//!   only places the drawn whisker lines.

use serde::{Deserialize, Serialize};

use crate::config::QuantileConfig;
use crate::error::StatsResult;
use crate::quantile::{mean, quantile, sort_ascending, sort_distinct};
use crate::strategy::{QuartileStrategy, WhiskerInput, WhiskerStrategy};

/// Immutable statistics of one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group label (x-axis category)
    pub label: String,
    /// Lower box edge
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Upper box edge
    pub q3: f64,
    /// Smallest point
    pub min: f64,
    /// Largest point
    pub max: f64,
    /// Arithmetic mean of the points
    pub mean: f64,
    /// Low whisker quantile
    pub low_whisker: f64,
    /// High whisker quantile
    pub high_whisker: f64,
    /// Number of points summarized
    pub count: usize,
    /// Ascending points
    pub sorted_points: Vec<f64>,
    /// Outliers, index-walk hits first, then value-rule hits; may repeat
    pub outliers: Vec<f64>,
    /// Where the index walk stopped: first index not taken from below and
    /// last index not taken from above (`-1` when the walk passed index 0)
    pub outlier_boundary_indexes: [i64; 2],
    /// Drawn whisker lines, `None` when the whisker strategy declined
    pub whisker_lines: Option<[f64; 2]>,
}

impl GroupSummary {
    /// Quartiles in the order the box is drawn: `[q1, median, q3]`
    pub fn quartiles(&self) -> [f64; 3] {
        [self.q1, self.median, self.q3]
    }

    /// Whisker pair, if drawn
    pub fn whiskers(&self) -> Option<[f64; 2]> {
        self.whisker_lines
    }

    /// Distinct points that were not classified as outliers
    pub fn non_outliers(&self) -> Vec<f64> {
        let mut distinct = self.sorted_points.clone();
        distinct.dedup();
        distinct.retain(|v| !self.outliers.contains(v));
        distinct
    }
}

/// Result of the dual-rule outlier classification
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierSplit {
    /// Flagged values, index-walk hits first
    pub outliers: Vec<f64>,
    /// Stop positions of the index walk
    pub boundary: [i64; 2],
}

/// Classify outliers of ascending points against a whisker pair
///
/// Rule (a) walks inward from both ends taking points strictly beyond the
/// whiskers widened by `(q3 - q1) * outlier_factor`. Rule (b) takes every
/// point at or beyond a whisker. Both outputs are concatenated as-is.
pub fn classify_outliers(
    sorted: &[f64],
    whiskers: [f64; 2],
    quartiles: [f64; 3],
    outlier_factor: f64,
) -> OutlierSplit {
    let [low_whisker, high_whisker] = whiskers;
    let [q1, _, q3] = quartiles;
    let widening = (q3 - q1) * outlier_factor;
    let mut outliers = Vec::new();

    let mut i = 0usize;
    while i < sorted.len() && sorted[i] < low_whisker - widening {
        outliers.push(sorted[i]);
        i += 1;
    }

    let mut j = sorted.len() as i64 - 1;
    while j >= 0 && sorted[j as usize] > high_whisker + widening {
        outliers.push(sorted[j as usize]);
        j -= 1;
    }

    outliers.extend(
        sorted
            .iter()
            .copied()
            .filter(|&v| v <= low_whisker || v >= high_whisker),
    );

    OutlierSplit {
        outliers,
        boundary: [i as i64, j],
    }
}

/// Builds [`GroupSummary`] records from raw arrays
#[derive(Debug, Clone)]
pub struct SummaryEngine {
    config: QuantileConfig,
    quartiles: QuartileStrategy,
    whiskers: WhiskerStrategy,
}

impl SummaryEngine {
    /// Create an engine, rejecting invalid probabilities
    pub fn new(config: QuantileConfig) -> StatsResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            quartiles: QuartileStrategy::default(),
            whiskers: WhiskerStrategy::default(),
        })
    }

    /// Replace the quartile strategy used by the points path
    pub fn with_quartile_strategy(mut self, strategy: QuartileStrategy) -> Self {
        self.quartiles = strategy;
        self
    }

    /// Replace the whisker strategy used by the points path
    pub fn with_whisker_strategy(mut self, strategy: WhiskerStrategy) -> Self {
        self.whiskers = strategy;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &QuantileConfig {
        &self.config
    }

    /// Summarize one time-bucketed group
    ///
    /// Returns `None` when the group has no points.
    pub fn summarize_grouped(&self, label: impl Into<String>, values: &[f64]) -> Option<GroupSummary> {
        let sorted = sort_distinct(values);
        let first = *sorted.first()?;
        let last = *sorted.last()?;

        let q1 = quantile(&sorted, self.config.q1_prob)?;
        let q3 = quantile(&sorted, self.config.q3_prob)?;
        let median = quantile(&sorted, 0.5)?;
        let low_whisker = quantile(&sorted, self.config.low_whisker_prob)?;
        let high_whisker = quantile(&sorted, self.config.high_whisker_prob)?;

        let split = classify_outliers(
            &sorted,
            [low_whisker, high_whisker],
            [q1, median, q3],
            self.config.outlier_factor,
        );

        Some(GroupSummary {
            label: label.into(),
            q1,
            median,
            q3,
            min: first,
            max: last,
            mean: mean(&sorted)?,
            low_whisker,
            high_whisker,
            count: sorted.len(),
            sorted_points: sorted,
            outliers: split.outliers,
            outlier_boundary_indexes: split.boundary,
            whisker_lines: Some([low_whisker, high_whisker]),
        })
    }

    /// Summarize raw points with the pluggable strategies
    ///
    /// `index` is the group position passed to the whisker strategy.
    /// Returns `None` when the group has no points.
    pub fn summarize_points(
        &self,
        index: usize,
        label: impl Into<String>,
        values: &[f64],
    ) -> Option<GroupSummary> {
        let label = label.into();
        let sorted = sort_ascending(values);
        let first = *sorted.first()?;
        let last = *sorted.last()?;

        let quartiles = self.quartiles.compute(&sorted, &self.config);
        let [q1, median, q3] = quartiles;
        let low_whisker = quantile(&sorted, self.config.low_whisker_prob)?;
        let high_whisker = quantile(&sorted, self.config.high_whisker_prob)?;

        let input = WhiskerInput {
            label: &label,
            sorted_points: &sorted,
            quartiles,
            config: &self.config,
        };
        let whisker_lines = self
            .whiskers
            .compute(&input, index)
            .map(|[lo, hi]| [sorted[lo], sorted[hi]]);

        // Without whiskers every point is an outlier
        let (outliers, boundary) = match whisker_lines {
            Some(_) => {
                let split = classify_outliers(
                    &sorted,
                    [low_whisker, high_whisker],
                    quartiles,
                    self.config.outlier_factor,
                );
                (split.outliers, split.boundary)
            }
            None => (sorted.clone(), [sorted.len() as i64, -1]),
        };

        Some(GroupSummary {
            label,
            q1,
            median,
            q3,
            min: first,
            max: last,
            mean: mean(&sorted)?,
            low_whisker,
            high_whisker,
            count: sorted.len(),
            sorted_points: sorted,
            outliers,
            outlier_boundary_indexes: boundary,
            whisker_lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SummaryEngine {
        SummaryEngine::new(QuantileConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(SummaryEngine::new(QuantileConfig::new(0.5, 0.25, 0.75, 0.95)).is_err());
    }

    #[test]
    fn test_grouped_dedups_points() {
        let summary = engine()
            .summarize_grouped("a", &[3.0, 1.0, 3.0, 2.0, 1.0])
            .unwrap();
        assert_eq!(summary.sorted_points, vec![1.0, 2.0, 3.0]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.median, 2.0);
        assert_eq!(summary.mean, 2.0);
    }

    #[test]
    fn test_grouped_quartiles() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let summary = engine().summarize_grouped("a", &values).unwrap();
        assert!((summary.q1 - 3.25).abs() < 1e-12);
        assert!((summary.median - 5.5).abs() < 1e-12);
        assert!((summary.q3 - 7.75).abs() < 1e-12);
        assert!((summary.low_whisker - 1.45).abs() < 1e-12);
        assert!((summary.high_whisker - 9.55).abs() < 1e-12);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 10.0);
    }

    #[test]
    fn test_grouped_outliers_dual_rule() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let summary = engine().summarize_grouped("a", &values).unwrap();
        // Index walk takes 1 and 10, the value rule takes them again
        assert_eq!(summary.outliers, vec![1.0, 10.0, 1.0, 10.0]);
        assert_eq!(summary.outlier_boundary_indexes, [1, 8]);
    }

    #[test]
    fn test_outlier_factor_widens_index_walk() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let config = QuantileConfig::default().with_outlier_factor(1.0);
        let summary = SummaryEngine::new(config)
            .unwrap()
            .summarize_grouped("a", &values)
            .unwrap();
        // Widened by the IQR (4.5) nothing is beyond, only the value rule fires
        assert_eq!(summary.outliers, vec![1.0, 10.0]);
        assert_eq!(summary.outlier_boundary_indexes, [0, 9]);
    }

    #[test]
    fn test_empty_group_is_none() {
        assert!(engine().summarize_grouped("a", &[]).is_none());
        assert!(engine().summarize_points(0, "a", &[]).is_none());
    }

    #[test]
    fn test_single_point_group() {
        let summary = engine().summarize_grouped("a", &[7.0]).unwrap();
        assert_eq!(summary.q1, 7.0);
        assert_eq!(summary.high_whisker, 7.0);
        assert_eq!(summary.outliers, vec![7.0]);
    }

    #[test]
    fn test_points_path_keeps_duplicates() {
        let summary = engine()
            .summarize_points(0, "a", &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])
            .unwrap();
        assert_eq!(summary.count, 8);
        assert_eq!(summary.median, 4.5);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.q1, 4.0);
        assert_eq!(summary.q3, 5.5);
        assert!((summary.low_whisker - 2.7).abs() < 1e-12);
        assert!((summary.high_whisker - 8.3).abs() < 1e-12);
        // Lines sit at the extremes, outliers follow the 5th/95th quantiles
        assert_eq!(summary.whiskers(), Some([2.0, 9.0]));
        assert_eq!(summary.outliers, vec![2.0, 9.0, 2.0, 9.0]);
        assert_eq!(summary.outlier_boundary_indexes, [1, 6]);
    }

    #[test]
    fn test_points_path_follows_whisker_probabilities() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let narrow = SummaryEngine::new(QuantileConfig::new(0.25, 0.25, 0.75, 0.75))
            .unwrap()
            .summarize_points(0, "a", &values)
            .unwrap();
        assert_eq!(narrow.low_whisker, 4.0);
        assert_eq!(narrow.high_whisker, 5.5);
        assert_eq!(
            narrow.outliers,
            vec![2.0, 9.0, 7.0, 2.0, 4.0, 4.0, 4.0, 7.0, 9.0]
        );
        assert_eq!(narrow.outlier_boundary_indexes, [1, 5]);

        let wide = engine().summarize_points(0, "a", &values).unwrap();
        assert_ne!(narrow.outliers, wide.outliers);
    }

    #[test]
    fn test_points_path_without_whiskers() {
        let summary = engine()
            .with_whisker_strategy(WhiskerStrategy::none())
            .summarize_points(0, "a", &[3.0, 1.0, 2.0])
            .unwrap();
        assert_eq!(summary.whiskers(), None);
        assert_eq!(summary.outliers, vec![1.0, 2.0, 3.0]);
        assert_eq!(summary.outlier_boundary_indexes, [3, -1]);
    }

    #[test]
    fn test_non_outliers() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let summary = engine().summarize_grouped("a", &values).unwrap();
        let inner = summary.non_outliers();
        assert_eq!(inner, (2..=9).map(|x| x as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_classify_outliers_walk_can_cross() {
        // Whiskers inside a constant run: every point is beyond on both sides
        let split = classify_outliers(&[5.0, 5.0], [6.0, 4.0], [5.0, 5.0, 5.0], 0.0);
        assert_eq!(split.boundary, [2, -1]);
        assert_eq!(split.outliers.len(), 6);
    }
}
