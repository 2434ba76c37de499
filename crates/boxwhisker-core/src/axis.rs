//! Y-axis layout for box charts
//!
//! Provides tick placement over the axis scale, the rotated axis title and
//! the optional goal line.

use serde::{Deserialize, Serialize};

use crate::format::TickFormatter;
use crate::scale::{LinearScale, ScaleMapping};

/// Target number of major ticks
const TARGET_TICKS: f64 = 10.0;

/// Upper bound on generated ticks
const MAX_TICKS: usize = 100;

/// A tick mark on the y-axis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    /// Position in data coordinates
    pub value: f64,

    /// Position in pixels
    pub pixel: f64,

    /// Label text
    pub label: String,
}

/// Horizontal goal line across the plot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalLine {
    pub value: f64,
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
}

/// Rotated y-axis title
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisTitle {
    pub text: String,
    /// Offset left of the axis line
    pub x: f64,
    /// Vertical centre, in rotated coordinates
    pub y: f64,
    pub rotation_deg: f64,
}

/// Complete y-axis of one frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YAxis {
    pub ticks: Vec<AxisTick>,
    pub title: Option<AxisTitle>,
    pub goal: Option<GoalLine>,
}

impl YAxis {
    /// Lay out the axis for a scale mapping
    ///
    /// `total_height` is the height of the whole chart including margins and
    /// `plot_width` the width the goal line spans. The goal line is drawn only
    /// when the goal is set and non-zero.
    pub fn layout(
        mapping: &ScaleMapping,
        formatter: &TickFormatter,
        title: &str,
        goal: Option<f64>,
        plot_width: f64,
        total_height: f64,
    ) -> Self {
        let scale = mapping.axis_scale();
        let ticks = calculate_ticks(&scale, formatter);

        let title = (!title.is_empty()).then(|| AxisTitle {
            text: title.to_string(),
            x: -total_height / 2.0,
            y: -60.0,
            rotation_deg: -90.0,
        });

        let goal = goal.filter(|g| *g != 0.0).map(|value| GoalLine {
            value,
            x1: 0.0,
            x2: plot_width,
            y: scale.map(value),
        });

        Self { ticks, title, goal }
    }
}

/// Calculate evenly spaced "nice" ticks across the scale domain
pub fn calculate_ticks(scale: &LinearScale, formatter: &TickFormatter) -> Vec<AxisTick> {
    let [d0, d1] = scale.domain;
    let (min, max) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return vec![];
    }

    let step = nice_step(range / TARGET_TICKS);
    let start = (min / step).ceil() * step;
    // Spans too small to divide (subnormal domains) have no usable step
    if step <= 0.0 || !step.is_finite() || !start.is_finite() {
        return vec![];
    }

    let mut ticks = Vec::new();
    for i in 0..MAX_TICKS {
        let value = start + step * i as f64;
        if value > max + step * 0.001 {
            break;
        }
        // Snap accumulated error around zero
        let value = if value.abs() < step * 1e-9 { 0.0 } else { value };
        ticks.push(AxisTick {
            value,
            pixel: scale.map(value),
            label: formatter.format(value),
        });
    }

    ticks
}

/// Round a raw step to 1, 2 or 5 times a power of ten
fn nice_step(rough_step: f64) -> f64 {
    let magnitude = 10.0_f64.powf(rough_step.abs().log10().floor());
    let residual = rough_step / magnitude;

    if residual <= 1.5 {
        magnitude
    } else if residual <= 3.0 {
        2.0 * magnitude
    } else if residual <= 7.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(domain: [f64; 2]) -> ScaleMapping {
        ScaleMapping {
            box_domain: domain,
            box_range: [100.0, 0.0],
            axis_domain: domain,
            axis_range: [105.0, 5.0],
            median_share: 0.5,
        }
    }

    #[test]
    fn test_calculate_ticks() {
        let scale = LinearScale::new([0.0, 100.0], [105.0, 5.0]);
        let ticks = calculate_ticks(&scale, &TickFormatter::default());

        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0].value, 0.0);
        assert_eq!(ticks[0].pixel, 105.0);
        assert_eq!(ticks[10].label, "100");
        assert_eq!(ticks[10].pixel, 5.0);
    }

    #[test]
    fn test_ticks_empty_domain() {
        let scale = LinearScale::new([5.0, 5.0], [100.0, 0.0]);
        assert!(calculate_ticks(&scale, &TickFormatter::default()).is_empty());
    }

    #[test]
    fn test_ticks_subnormal_domain() {
        let scale = LinearScale::new([0.0, 5e-324], [100.0, 0.0]);
        assert!(calculate_ticks(&scale, &TickFormatter::default()).is_empty());
    }

    #[test]
    fn test_ticks_are_bounded() {
        for domain in [[0.0, 1e-300], [-1e308, 1e308], [1e15, 1e15 + 4.0]] {
            let scale = LinearScale::new(domain, [100.0, 0.0]);
            assert!(calculate_ticks(&scale, &TickFormatter::default()).len() <= MAX_TICKS);
        }
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(1.0), 1.0);
        assert_eq!(nice_step(2.5), 2.0);
        assert_eq!(nice_step(4.0), 5.0);
        assert_eq!(nice_step(8.0), 10.0);
    }

    #[test]
    fn test_goal_line() {
        let axis = YAxis::layout(
            &mapping([0.0, 10.0]),
            &TickFormatter::default(),
            "Latency",
            Some(5.0),
            300.0,
            150.0,
        );
        let goal = axis.goal.unwrap();
        assert_eq!(goal.y, 55.0);
        assert_eq!(goal.x2, 300.0);
        let title = axis.title.unwrap();
        assert_eq!(title.text, "Latency");
        assert_eq!(title.x, -75.0);
    }

    #[test]
    fn test_zero_goal_not_drawn() {
        let axis = YAxis::layout(
            &mapping([0.0, 10.0]),
            &TickFormatter::default(),
            "",
            Some(0.0),
            300.0,
            150.0,
        );
        assert!(axis.goal.is_none());
        assert!(axis.title.is_none());
    }
}
