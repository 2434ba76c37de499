//! Chart configuration
//!
//! [`ChartConfig`] is the mutable configuration surface of a box chart.
//! Every setter returns the same handle so calls can be chained:
//!
//! ```
//! use boxwhisker_core::ChartConfig;
//!
//! let mut config = ChartConfig::new();
//! config.set_width(120.0).set_height(400.0).set_transition_duration_ms(250.0);
//! assert_eq!(config.width(), 120.0);
//! ```
//!
//! No semantic validation happens here; probability ordering is checked by
//! the statistics engine.

use boxwhisker_stats::{QuartileStrategy, WhiskerStrategy};

use crate::diff::Easing;
use crate::format::TickFormatter;

/// Configuration consumed by the render-diff engine
#[derive(Debug, Clone)]
pub struct ChartConfig {
    width: f64,
    height: f64,
    transition_duration_ms: f64,
    domain: Option<[f64; 2]>,
    range: Option<[f64; 2]>,
    show_labels: bool,
    show_data_points: bool,
    tick_formatter: TickFormatter,
    whisker_strategy: WhiskerStrategy,
    quartile_strategy: QuartileStrategy,
    easing: Easing,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            transition_duration_ms: 0.0,
            domain: None,
            range: None,
            show_labels: true,
            show_data_points: true,
            tick_formatter: TickFormatter::default(),
            whisker_strategy: WhiskerStrategy::default(),
            quartile_strategy: QuartileStrategy::default(),
            easing: Easing::default(),
        }
    }
}

impl ChartConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Box width in pixels
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Set the box width
    pub fn set_width(&mut self, width: f64) -> &mut Self {
        self.width = width;
        self
    }

    /// Plot height in pixels
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Set the plot height
    pub fn set_height(&mut self, height: f64) -> &mut Self {
        self.height = height;
        self
    }

    /// Duration of update and exit transitions
    pub fn transition_duration_ms(&self) -> f64 {
        self.transition_duration_ms
    }

    /// Set the transition duration; zero applies changes immediately
    pub fn set_transition_duration_ms(&mut self, duration: f64) -> &mut Self {
        self.transition_duration_ms = duration;
        self
    }

    /// Value domain override; `None` uses each group's `[min, max]`
    pub fn domain(&self) -> Option<[f64; 2]> {
        self.domain
    }

    /// Override the value domain, or `None` to follow each group
    pub fn set_domain(&mut self, domain: Option<[f64; 2]>) -> &mut Self {
        self.domain = domain;
        self
    }

    /// Pixel range override; `None` uses `[height, 0]`
    pub fn range(&self) -> Option<[f64; 2]> {
        self.range
    }

    /// Override the pixel range, or `None` for `[height, 0]`
    pub fn set_range(&mut self, range: Option<[f64; 2]>) -> &mut Self {
        self.range = range;
        self
    }

    /// Whether box and whisker tick labels are drawn
    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    /// Toggle box and whisker tick labels
    pub fn set_show_labels(&mut self, show: bool) -> &mut Self {
        self.show_labels = show;
        self
    }

    /// Whether non-outlier points are drawn
    pub fn show_data_points(&self) -> bool {
        self.show_data_points
    }

    /// Toggle non-outlier points
    pub fn set_show_data_points(&mut self, show: bool) -> &mut Self {
        self.show_data_points = show;
        self
    }

    /// Formatter for tick labels and tooltip values
    pub fn tick_formatter(&self) -> &TickFormatter {
        &self.tick_formatter
    }

    /// Replace the tick formatter
    pub fn set_tick_formatter(&mut self, formatter: TickFormatter) -> &mut Self {
        self.tick_formatter = formatter;
        self
    }

    /// Whisker strategy for the points path
    pub fn whisker_strategy(&self) -> &WhiskerStrategy {
        &self.whisker_strategy
    }

    /// Replace the whisker strategy
    pub fn set_whisker_strategy(&mut self, strategy: WhiskerStrategy) -> &mut Self {
        self.whisker_strategy = strategy;
        self
    }

    /// Quartile strategy for the points path
    pub fn quartile_strategy(&self) -> &QuartileStrategy {
        &self.quartile_strategy
    }

    /// Replace the quartile strategy
    pub fn set_quartile_strategy(&mut self, strategy: QuartileStrategy) -> &mut Self {
        self.quartile_strategy = strategy;
        self
    }

    /// Interpolation curve of transitions
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Set the transition easing
    pub fn set_easing(&mut self, easing: Easing) -> &mut Self {
        self.easing = easing;
        self
    }

    /// Immutable copy for one render invocation
    pub fn snapshot(&self) -> ChartConfig {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChartConfig::default();
        assert_eq!(config.width(), 1.0);
        assert_eq!(config.height(), 1.0);
        assert_eq!(config.transition_duration_ms(), 0.0);
        assert!(config.domain().is_none());
        assert!(config.range().is_none());
        assert!(config.show_labels());
        assert!(config.show_data_points());
        assert_eq!(config.tick_formatter().format(3.4), "3");
    }

    #[test]
    fn test_fluent_setters() {
        let mut config = ChartConfig::new();
        config
            .set_width(80.0)
            .set_height(300.0)
            .set_domain(Some([0.0, 10.0]))
            .set_range(Some([300.0, 0.0]))
            .set_show_labels(false)
            .set_show_data_points(false)
            .set_easing(Easing::Linear);

        assert_eq!(config.width(), 80.0);
        assert_eq!(config.height(), 300.0);
        assert_eq!(config.domain(), Some([0.0, 10.0]));
        assert_eq!(config.range(), Some([300.0, 0.0]));
        assert!(!config.show_labels());
        assert!(!config.show_data_points());
        assert_eq!(config.easing(), Easing::Linear);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut config = ChartConfig::new();
        config.set_width(10.0);
        let snapshot = config.snapshot();
        config.set_width(20.0);
        assert_eq!(snapshot.width(), 10.0);
    }
}
