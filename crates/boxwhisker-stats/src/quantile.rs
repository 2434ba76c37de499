//! Quantile estimation over sorted samples
//!
//! All box statistics are built on the linear-interpolation estimator
//! (Hyndman & Fan type 7, the default of R and d3):
//!
//! ```text
//! pos  = (n - 1) * p
//! lo   = floor(pos)
//! Q(p) = a[lo] + (pos - lo) * (a[lo + 1] - a[lo])
//! ```
//!
//! The estimator is exact at the ends: `Q(0) = min`, `Q(1) = max`.

/// Compute the R-7 quantile of an ascending slice
///
/// Returns `None` for an empty slice. `p` is clamped to `[0, 1]`; callers
/// that need strict validation go through [`crate::QuantileConfig`].
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    let pos = (n - 1) as f64 * p;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;

    if lo + 1 >= n {
        return Some(sorted[n - 1]);
    }

    let a = sorted[lo];
    let b = sorted[lo + 1];
    Some(a + frac * (b - a))
}

/// Median of an ascending slice (`Q(0.5)`)
pub fn median(sorted: &[f64]) -> Option<f64> {
    quantile(sorted, 0.5)
}

/// Arithmetic mean, `None` when empty
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sort values ascending
///
/// Uses the IEEE total order so the sort never panics; observations are
/// validated as finite before they get here.
pub fn sort_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Sort values ascending and drop adjacent duplicates
pub fn sort_distinct(values: &[f64]) -> Vec<f64> {
    let mut sorted = sort_ascending(values);
    sorted.dedup();
    sorted
}
