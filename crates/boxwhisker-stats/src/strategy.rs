//! Pluggable whisker and quartile strategies
//!
//! Strategies are plain function values injected at configuration time.
//! Both are cheap to clone (reference counted) so a configuration snapshot
//! can be taken for every render.

use std::fmt;
use std::sync::Arc;

use crate::config::QuantileConfig;
use crate::quantile::quantile;

/// Everything a whisker strategy may look at for one group
#[derive(Debug, Clone, Copy)]
pub struct WhiskerInput<'a> {
    /// Group label
    pub label: &'a str,
    /// Ascending points of the group
    pub sorted_points: &'a [f64],
    /// `[q1, median, q3]` as produced by the quartile strategy
    pub quartiles: [f64; 3],
    /// Active quantile configuration
    pub config: &'a QuantileConfig,
}

type WhiskerFn = dyn Fn(&WhiskerInput<'_>, usize) -> Option<[usize; 2]> + Send + Sync;
type QuartileFn = dyn Fn(&[f64], &QuantileConfig) -> [f64; 3] + Send + Sync;

/// Chooses the whisker positions of a group as indexes into its sorted points
///
/// The second argument is the group index. Returning `None` draws no
/// whiskers and classifies every point as an outlier.
#[derive(Clone)]
pub struct WhiskerStrategy(Arc<WhiskerFn>);

impl WhiskerStrategy {
    /// Wrap a custom whisker function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&WhiskerInput<'_>, usize) -> Option<[usize; 2]> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Whiskers at the extremes: `[0, n - 1]`
    pub fn extremes() -> Self {
        Self::new(|input, _| {
            let n = input.sorted_points.len();
            (n > 0).then(|| [0, n - 1])
        })
    }

    /// Whiskers at the innermost points within `k` box heights of the box
    ///
    /// This is the classic Tukey fence (`k = 1.5`).
    pub fn tukey(k: f64) -> Self {
        Self::new(move |input, _| {
            let points = input.sorted_points;
            if points.is_empty() {
                return None;
            }
            let [q1, _, q3] = input.quartiles;
            let iqr = q3 - q1;
            let low_fence = q1 - k * iqr;
            let high_fence = q3 + k * iqr;

            let lo = points.iter().position(|&v| v >= low_fence)?;
            let hi = points.iter().rposition(|&v| v <= high_fence)?;
            (lo <= hi).then_some([lo, hi])
        })
    }

    /// No whiskers for any group
    pub fn none() -> Self {
        Self::new(|_, _| None)
    }

    /// Run the strategy, clamping the indexes into the point range
    pub fn compute(&self, input: &WhiskerInput<'_>, index: usize) -> Option<[usize; 2]> {
        let n = input.sorted_points.len();
        if n == 0 {
            return None;
        }
        let [lo, hi] = (self.0)(input, index)?;
        Some([lo.min(n - 1), hi.min(n - 1)])
    }
}

impl Default for WhiskerStrategy {
    fn default() -> Self {
        Self::extremes()
    }
}

impl fmt::Debug for WhiskerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WhiskerStrategy(..)")
    }
}

/// Produces `[q1, median, q3]` from ascending points
#[derive(Clone)]
pub struct QuartileStrategy(Arc<QuartileFn>);

impl QuartileStrategy {
    /// Wrap a custom quartile function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[f64], &QuantileConfig) -> [f64; 3] + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// `[Q(q1_prob), Q(0.5), Q(q3_prob)]`; with the default configuration
    /// this is `[Q(.25), Q(.5), Q(.75)]`
    pub fn configured() -> Self {
        Self::new(|sorted, config| {
            [
                quantile(sorted, config.q1_prob).unwrap_or(f64::NAN),
                quantile(sorted, 0.5).unwrap_or(f64::NAN),
                quantile(sorted, config.q3_prob).unwrap_or(f64::NAN),
            ]
        })
    }

    /// `[Q(.25), Q(.5), Q(.75)]` regardless of configuration
    pub fn standard() -> Self {
        Self::new(|sorted, _| {
            [
                quantile(sorted, 0.25).unwrap_or(f64::NAN),
                quantile(sorted, 0.5).unwrap_or(f64::NAN),
                quantile(sorted, 0.75).unwrap_or(f64::NAN),
            ]
        })
    }

    /// Run the strategy
    pub fn compute(&self, sorted: &[f64], config: &QuantileConfig) -> [f64; 3] {
        (self.0)(sorted, config)
    }
}

impl Default for QuartileStrategy {
    fn default() -> Self {
        Self::configured()
    }
}

impl fmt::Debug for QuartileStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QuartileStrategy(..)")
    }
}
