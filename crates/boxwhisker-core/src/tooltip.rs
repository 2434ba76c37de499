//! Tooltip descriptors attached to rendered elements

use serde::{Deserialize, Serialize};

use boxwhisker_stats::QuantileConfig;

use crate::diff::{Datum, ElementCategory};
use crate::format::{ordinal_percent, TickFormatter};

/// One line of a tooltip
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipItem {
    pub display_name: String,
    pub value: String,
}

impl TooltipItem {
    pub fn new(display_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            value: value.into(),
        }
    }
}

/// Quantile captions derived from the configured probabilities
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipLabels {
    pub low_whisker: String,
    pub q1: String,
    pub q3: String,
    pub high_whisker: String,
}

impl TooltipLabels {
    /// Captions such as `"25th quantile"`
    pub fn from_config(config: &QuantileConfig) -> Self {
        let caption = |p: f64| format!("{} quantile", ordinal_percent(p));
        Self {
            low_whisker: caption(config.low_whisker_prob),
            q1: caption(config.q1_prob),
            q3: caption(config.q3_prob),
            high_whisker: caption(config.high_whisker_prob),
        }
    }
}

impl Default for TooltipLabels {
    fn default() -> Self {
        Self::from_config(&QuantileConfig::default())
    }
}

/// Tooltip lines of one element
///
/// `slot` is the element's index within its category; whisker elements
/// alternate between the low and high caption on it.
pub fn tooltip_for(
    category: ElementCategory,
    datum: &Datum,
    slot: usize,
    group_label: &str,
    formatter: &TickFormatter,
    labels: &TooltipLabels,
) -> Vec<TooltipItem> {
    match (category, datum) {
        (ElementCategory::OutlierPoint | ElementCategory::DataPoint, Datum::Value(v)) => {
            vec![TooltipItem::new(group_label, formatter.format(*v))]
        }
        (ElementCategory::Box, Datum::Quartiles([q1, median, q3])) => vec![
            TooltipItem::new(labels.q3.clone(), formatter.format(*q3)),
            TooltipItem::new("median", formatter.format(*median)),
            TooltipItem::new(labels.q1.clone(), formatter.format(*q1)),
        ],
        (ElementCategory::MeanPoint, Datum::Value(v)) => {
            vec![TooltipItem::new("Mean", formatter.format(*v))]
        }
        (ElementCategory::WhiskerLine | ElementCategory::WhiskerTick, Datum::Value(v)) => {
            let caption = if slot % 2 == 0 {
                &labels.low_whisker
            } else {
                &labels.high_whisker
            };
            vec![TooltipItem::new(caption.clone(), formatter.format(*v))]
        }
        _ => Vec::new(),
    }
}
