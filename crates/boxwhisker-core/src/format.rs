//! Value formatting for tick labels and tooltips

use std::fmt;
use std::sync::Arc;

type FormatFn = dyn Fn(f64) -> String + Send + Sync;

/// Formats a numeric value for display
#[derive(Clone)]
pub struct TickFormatter(Arc<FormatFn>);

impl TickFormatter {
    /// Wrap a custom formatting function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Fixed number of decimals
    pub fn fixed(decimals: usize) -> Self {
        Self::new(move |value| {
            let text = format!("{:.prec$}", value, prec = decimals);
            strip_negative_zero(text)
        })
    }

    /// Format a value
    pub fn format(&self, value: f64) -> String {
        (self.0)(value)
    }
}

impl Default for TickFormatter {
    /// Whole numbers, the `"0"` format string of the host
    fn default() -> Self {
        Self::fixed(0)
    }
}

impl fmt::Debug for TickFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TickFormatter(..)")
    }
}

fn strip_negative_zero(text: String) -> String {
    let is_negative_zero = text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.');
    if is_negative_zero {
        text[1..].to_string()
    } else {
        text
    }
}

/// Ordinal label of a probability as a percentage: `0.25` → `"25th"`
///
/// Whole percentages follow English ordinals (`1st`, `2nd`, `3rd`,
/// `11th`-`13th`); fractional percentages always take `th`.
pub fn ordinal_percent(probability: f64) -> String {
    // Rounded so that 0.07 * 100 reads as 7
    let percent = (probability * 100.0 * 1e10).round() / 1e10;

    if percent.fract() != 0.0 || !percent.is_finite() {
        return format!("{}th", percent);
    }

    let n = percent as i64;
    let m = n.rem_euclid(100);
    let suffix = if (11..=13).contains(&m) {
        "th"
    } else {
        match m % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{}{}", n, suffix)
}
