//! Visual element identity and attributes

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The nine kinds of shapes drawn for one group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementCategory {
    /// Vertical line spanning the whiskers
    CenterLine,
    /// Rectangle from q1 to q3
    Box,
    /// Horizontal line at the median
    MedianLine,
    /// Circle at the mean
    MeanPoint,
    /// Horizontal lines at the whiskers
    WhiskerLine,
    /// Labels next to the whiskers
    WhiskerTick,
    /// Labels next to q1, median and q3
    BoxTick,
    /// Circles at outliers
    OutlierPoint,
    /// Circles at non-outlier points
    DataPoint,
}

impl ElementCategory {
    /// Every category in drawing order
    pub const ALL: [ElementCategory; 9] = [
        ElementCategory::CenterLine,
        ElementCategory::Box,
        ElementCategory::MedianLine,
        ElementCategory::MeanPoint,
        ElementCategory::WhiskerLine,
        ElementCategory::OutlierPoint,
        ElementCategory::DataPoint,
        ElementCategory::BoxTick,
        ElementCategory::WhiskerTick,
    ];

    /// Shape and class name of the drawn element
    pub fn selector(&self) -> &'static str {
        match self {
            ElementCategory::CenterLine => "line.center",
            ElementCategory::Box => "rect.box",
            ElementCategory::MedianLine => "line.median",
            ElementCategory::MeanPoint => "circle.mean",
            ElementCategory::WhiskerLine => "line.whisker",
            ElementCategory::WhiskerTick => "text.whisker",
            ElementCategory::BoxTick => "text.box",
            ElementCategory::OutlierPoint => "circle.outlier",
            ElementCategory::DataPoint => "circle.datapoint",
        }
    }

}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/// Join key of an element within its container and category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKey {
    /// Fixed position within the group (box edge, whisker end)
    Slot(usize),
    /// A data value; `occurrence` separates repeated values
    Value { bits: u64, occurrence: usize },
}

impl ElementKey {
    /// Key for the `occurrence`-th appearance of `value`
    pub fn value(value: f64, occurrence: usize) -> Self {
        ElementKey::Value {
            bits: value_bits(value),
            occurrence,
        }
    }

    /// The keyed value, for value keys
    pub fn as_value(&self) -> Option<f64> {
        match self {
            ElementKey::Slot(_) => None,
            ElementKey::Value { bits, .. } => Some(f64::from_bits(*bits)),
        }
    }
}

/// Join bits of a value; -0.0 and 0.0 join as the same point
pub(crate) fn value_bits(value: f64) -> u64 {
    let normalized = if value == 0.0 { 0.0 } else { value };
    normalized.to_bits()
}

/// Full identity of a live element
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId {
    /// Group label of the owning container
    pub container: String,
    pub category: ElementCategory,
    pub key: ElementKey,
}

impl ElementId {
    pub fn new(container: impl Into<String>, category: ElementCategory, key: ElementKey) -> Self {
        Self {
            container: container.into(),
            category,
            key,
        }
    }
}

/// Numeric attribute of a drawn shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attr {
    X,
    Y,
    X1,
    X2,
    Y1,
    Y2,
    Width,
    Height,
    Cx,
    Cy,
    R,
    Dx,
    Dy,
    Opacity,
}

/// Horizontal anchoring of a text element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    End,
}

/// Attribute set of one element
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub values: BTreeMap<Attr, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<TextAnchor>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute assignment
    pub fn with(mut self, attr: Attr, value: f64) -> Self {
        self.values.insert(attr, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn get(&self, attr: Attr) -> Option<f64> {
        self.values.get(&attr).copied()
    }

    /// Blend towards `to` at eased progress `t`
    ///
    /// Attributes missing on one side take the other side's value. Text and
    /// anchor jump to the target immediately.
    pub fn interpolate(&self, to: &Attributes, t: f64) -> Attributes {
        let mut values = self.values.clone();
        for (attr, &end) in &to.values {
            let start = self.values.get(attr).copied().unwrap_or(end);
            values.insert(*attr, start + (end - start) * t);
        }
        Attributes {
            values,
            text: to.text.clone().or_else(|| self.text.clone()),
            anchor: to.anchor.or(self.anchor),
        }
    }
}

/// Data bound to an element, kept so exits can be re-projected
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Datum {
    /// Whisker pair of the center line
    Span([f64; 2]),
    /// `[q1, median, q3]` of the box
    Quartiles([f64; 3]),
    /// A single value
    Value(f64),
}
