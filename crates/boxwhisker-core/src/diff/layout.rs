//! Target element sets computed from a group summary
//!
//! Coordinates are local to the group container: `x` runs across the box
//! width, `y` is the box scale (pixels grow downward).

use std::collections::BTreeMap;

use boxwhisker_stats::GroupSummary;

use super::element::{value_bits, Attr, Attributes, Datum, ElementCategory, ElementKey, TextAnchor};
use crate::format::TickFormatter;
use crate::scale::LinearScale;
use crate::tooltip::{tooltip_for, TooltipItem, TooltipLabels};

/// Opacity of a fully faded exit
pub const FADED_OPACITY: f64 = 1e-6;

const MEAN_RADIUS: f64 = 4.0;
const POINT_RADIUS: f64 = 3.0;
const TICK_OFFSET: f64 = 6.0;
const TEXT_DY: f64 = 0.3;

/// Everything needed to place elements of one container
#[derive(Clone, Copy, Debug)]
pub struct LayoutContext<'a> {
    pub group_label: &'a str,
    pub width: f64,
    pub scale: LinearScale,
    pub formatter: &'a TickFormatter,
    pub labels: &'a TooltipLabels,
    pub show_labels: bool,
    pub show_data_points: bool,
}

/// Desired state of one element after a diff pass
#[derive(Clone, Debug, PartialEq)]
pub struct TargetElement {
    pub key: ElementKey,
    /// Index within the category, drives alternating layout and captions
    pub slot: usize,
    pub datum: Datum,
    pub attrs: Attributes,
    pub tooltip: Vec<TooltipItem>,
}

/// Target elements of `category` for one group
pub fn targets(category: ElementCategory, summary: &GroupSummary, ctx: &LayoutContext<'_>) -> Vec<TargetElement> {
    let whiskers = summary.whiskers();

    let slotted = |datums: Vec<Datum>| -> Vec<TargetElement> {
        datums
            .into_iter()
            .enumerate()
            .map(|(slot, datum)| build(category, ElementKey::Slot(slot), slot, datum, ctx))
            .collect()
    };

    let keyed = |values: &[f64]| -> Vec<TargetElement> {
        let mut seen: BTreeMap<u64, usize> = BTreeMap::new();
        values
            .iter()
            .enumerate()
            .map(|(slot, &v)| {
                let count = seen.entry(value_bits(v)).or_insert(0);
                let occurrence = *count;
                *count += 1;
                build(category, ElementKey::value(v, occurrence), slot, Datum::Value(v), ctx)
            })
            .collect()
    };

    match category {
        ElementCategory::CenterLine => slotted(whiskers.map(Datum::Span).into_iter().collect()),
        ElementCategory::Box => slotted(vec![Datum::Quartiles(summary.quartiles())]),
        ElementCategory::MedianLine => slotted(vec![Datum::Value(summary.median)]),
        ElementCategory::MeanPoint => keyed(&[summary.mean]),
        ElementCategory::WhiskerLine => slotted(
            whiskers
                .map(|w| w.iter().map(|&v| Datum::Value(v)).collect())
                .unwrap_or_default(),
        ),
        ElementCategory::WhiskerTick if ctx.show_labels => slotted(
            whiskers
                .map(|w| w.iter().map(|&v| Datum::Value(v)).collect())
                .unwrap_or_default(),
        ),
        ElementCategory::BoxTick if ctx.show_labels => slotted(
            summary
                .quartiles()
                .iter()
                .map(|&v| Datum::Value(v))
                .collect(),
        ),
        ElementCategory::OutlierPoint => keyed(&summary.outliers),
        ElementCategory::DataPoint if ctx.show_data_points => keyed(&summary.non_outliers()),
        ElementCategory::WhiskerTick | ElementCategory::BoxTick | ElementCategory::DataPoint => Vec::new(),
    }
}

fn build(
    category: ElementCategory,
    key: ElementKey,
    slot: usize,
    datum: Datum,
    ctx: &LayoutContext<'_>,
) -> TargetElement {
    let attrs = project(category, &datum, slot, ctx);
    let tooltip = tooltip_for(category, &datum, slot, ctx.group_label, ctx.formatter, ctx.labels);
    TargetElement {
        key,
        slot,
        datum,
        attrs,
        tooltip,
    }
}

/// Attributes of an element bound to `datum`, fully visible
pub fn project(category: ElementCategory, datum: &Datum, slot: usize, ctx: &LayoutContext<'_>) -> Attributes {
    let y = |v: f64| ctx.scale.map(v);
    let w = ctx.width;
    let odd = slot % 2 == 1;

    let attrs = match (category, datum) {
        (ElementCategory::CenterLine, Datum::Span([lo, hi])) => Attributes::new()
            .with(Attr::X1, w / 2.0)
            .with(Attr::X2, w / 2.0)
            .with(Attr::Y1, y(*lo))
            .with(Attr::Y2, y(*hi)),
        (ElementCategory::Box, Datum::Quartiles([q1, _, q3])) => Attributes::new()
            .with(Attr::X, 0.0)
            .with(Attr::Width, w)
            .with(Attr::Y, y(*q3))
            .with(Attr::Height, y(*q1) - y(*q3)),
        (ElementCategory::MedianLine | ElementCategory::WhiskerLine, Datum::Value(v)) => Attributes::new()
            .with(Attr::X1, 0.0)
            .with(Attr::X2, w)
            .with(Attr::Y1, y(*v))
            .with(Attr::Y2, y(*v)),
        (ElementCategory::MeanPoint, Datum::Value(v)) => Attributes::new()
            .with(Attr::R, MEAN_RADIUS)
            .with(Attr::Cx, w * 3.0 / 4.0)
            .with(Attr::Cy, y(*v)),
        (ElementCategory::OutlierPoint | ElementCategory::DataPoint, Datum::Value(v)) => Attributes::new()
            .with(Attr::R, POINT_RADIUS)
            .with(Attr::Cx, w / 2.0)
            .with(Attr::Cy, y(*v)),
        (ElementCategory::WhiskerTick, Datum::Value(v)) => Attributes::new()
            .with(Attr::X, w)
            .with(Attr::Dx, TICK_OFFSET)
            .with(Attr::Dy, TEXT_DY)
            .with(Attr::Y, y(*v))
            .with_text(ctx.formatter.format(*v))
            .with_anchor(TextAnchor::Start),
        (ElementCategory::BoxTick, Datum::Value(v)) => Attributes::new()
            .with(Attr::X, if odd { w } else { 0.0 })
            .with(Attr::Dx, if odd { TICK_OFFSET } else { -TICK_OFFSET })
            .with(Attr::Dy, TEXT_DY)
            .with(Attr::Y, y(*v))
            .with_text(ctx.formatter.format(*v))
            .with_anchor(if odd { TextAnchor::Start } else { TextAnchor::End }),
        _ => Attributes::new(),
    };

    attrs.with(Attr::Opacity, 1.0)
}

/// Faded end state of an exiting element, re-projected through `ctx`
pub fn project_exit(category: ElementCategory, datum: &Datum, slot: usize, ctx: &LayoutContext<'_>) -> Attributes {
    project(category, datum, slot, ctx).with(Attr::Opacity, FADED_OPACITY)
}
