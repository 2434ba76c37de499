//! Scale derivation for box plots
//!
//! [`compute_scales`] maps a [`PlotDataset`] to the domain/range pairs of the
//! boxes and of the y-axis. The mapping is anchored on the median of the
//! per-group medians: extreme values above the whisker band are compressed
//! so a single outlier cannot flatten every box against the bottom.
//!
//! ```text
//! median_share = max(median_of_medians / max, 0.30)
//! top          = min(max, high_whisker + 0.5 * (high_whisker - median_of_medians))
//! box:  [min, top] -> [height, 0]
//! axis: [min, top] -> [height + top_margin, top_margin]
//! ```

use serde::{Deserialize, Serialize};

use boxwhisker_stats::{median, sort_ascending, GroupSummary};

use crate::error::{ScaleError, ScaleResult};

/// Smallest share of the plot reserved below the median cluster
pub const MIN_MEDIAN_SHARE: f64 = 0.30;

/// Everything drawn in one render cycle
///
/// Built fresh each cycle and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotDataset {
    /// Chart title
    pub title: String,
    /// X-axis title
    pub x_axis_title: String,
    /// Y-axis title
    pub y_axis_title: String,
    /// One summary per drawn group
    pub groups: Vec<GroupSummary>,
    /// Optional goal value drawn as a horizontal line
    pub goal: Option<f64>,
}

impl PlotDataset {
    /// Create a dataset without titles or goal
    pub fn new(groups: Vec<GroupSummary>) -> Self {
        Self {
            title: String::new(),
            x_axis_title: String::new(),
            y_axis_title: String::new(),
            groups,
            goal: None,
        }
    }

    /// Set the y-axis title
    pub fn with_y_axis_title(mut self, title: impl Into<String>) -> Self {
        self.y_axis_title = title.into();
        self
    }

    /// Set the goal value
    pub fn with_goal(mut self, goal: Option<f64>) -> Self {
        self.goal = goal;
        self
    }

    /// Group labels in drawing order
    pub fn labels(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.label.clone()).collect()
    }
}

/// Domain/range pairs for boxes and the y-axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleMapping {
    /// Value domain of the boxes
    pub box_domain: [f64; 2],
    /// Pixel range of the boxes (inverted)
    pub box_range: [f64; 2],
    /// Value domain of the y-axis
    pub axis_domain: [f64; 2],
    /// Pixel range of the y-axis, offset by the top margin
    pub axis_range: [f64; 2],
    /// Adaptive share reserved below the median cluster
    pub median_share: f64,
}

impl ScaleMapping {
    /// Linear scale of the y-axis
    pub fn axis_scale(&self) -> LinearScale {
        LinearScale::new(self.axis_domain, self.axis_range)
    }
}

/// Derive the box and axis scales of a dataset
pub fn compute_scales(dataset: &PlotDataset, height: f64, top_margin: f64) -> ScaleResult<ScaleMapping> {
    let first = dataset.groups.first().ok_or(ScaleError::EmptyDataset)?;

    let mut min = dataset.goal.unwrap_or(f64::INFINITY);
    let mut max = dataset.goal.unwrap_or(f64::NEG_INFINITY);
    let mut high_whisker = first.high_whisker;
    let mut medians = Vec::with_capacity(dataset.groups.len());

    for group in &dataset.groups {
        medians.push(group.median);
        min = min.min(group.min);
        max = max.max(group.max);
        high_whisker = high_whisker.max(group.high_whisker);
    }

    let median_of_medians = median(&sort_ascending(&medians)).ok_or(ScaleError::EmptyDataset)?;

    // NaN (max of zero over zero) also floors
    let median_share = (median_of_medians / max).max(MIN_MEDIAN_SHARE);
    let top = max.min(high_whisker + 0.5 * (high_whisker - median_of_medians));

    Ok(ScaleMapping {
        box_domain: [min, top],
        box_range: [height, 0.0],
        axis_domain: [min, top],
        axis_range: [height + top_margin, top_margin],
        median_share,
    })
}

/// Linear mapping from a value domain to a pixel range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Map a value into the range
    ///
    /// A zero-width domain maps everything to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) * (r1 - r0) / span
    }
}

/// Ordinal scale placing one rounded band per label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    labels: Vec<String>,
    starts: Vec<f64>,
    bandwidth: f64,
}

impl BandScale {
    /// Padding between bands as a fraction of the step
    pub const PADDING: f64 = 0.7;
    /// Padding at both ends as a fraction of the step
    pub const OUTER_PADDING: f64 = 0.3;

    /// Lay out `labels` over `[0, width]` with the default paddings
    pub fn new(labels: Vec<String>, width: f64) -> Self {
        Self::with_padding(labels, [0.0, width], Self::PADDING, Self::OUTER_PADDING)
    }

    /// Lay out `labels` over `extent` with rounded band positions
    pub fn with_padding(labels: Vec<String>, extent: [f64; 2], padding: f64, outer_padding: f64) -> Self {
        let n = labels.len() as f64;
        let [start, stop] = if extent[1] < extent[0] {
            [extent[1], extent[0]]
        } else {
            extent
        };

        if labels.is_empty() {
            return Self {
                labels,
                starts: Vec::new(),
                bandwidth: 0.0,
            };
        }

        let step = ((stop - start) / (n - padding + 2.0 * outer_padding)).floor();
        let error = stop - start - (n - padding) * step;
        let first = start + (error / 2.0).round();
        let starts = (0..labels.len()).map(|i| first + step * i as f64).collect();

        Self {
            labels,
            starts,
            bandwidth: (step * (1.0 - padding)).round(),
        }
    }

    /// Left edge of the band of `label`
    pub fn position(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.starts[i])
    }

    /// Width of every band
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Labels in order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
