//! Incremental render diffing
//!
//! [`RenderDiffEngine`] keeps a registry of live elements, one container per
//! group label and one layer per [`ElementCategory`] inside it. Each render
//! pass joins freshly computed target elements against that registry:
//!
//! - **enter**: key not live; the element is created at its final attributes
//! - **update**: key live; attributes animate from where they are now
//! - **exit**: key gone; the element fades out, then is removed
//!
//! Categories are diffed independently. A pass that starts while earlier
//! transitions are still running retargets them from their current sampled
//! attributes; an exiting element whose key comes back is revived in place.
//! Time is supplied by the caller (`now_ms`), and [`RenderDiffEngine::tick`]
//! settles finished transitions.

mod element;
mod layout;
mod transition;

pub use element::*;
pub use layout::{project, project_exit, targets, LayoutContext, TargetElement, FADED_OPACITY};
pub use transition::*;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use boxwhisker_stats::GroupSummary;

use crate::config::ChartConfig;
use crate::scale::{BandScale, LinearScale};
use crate::tooltip::{TooltipItem, TooltipLabels};

/// A rendered element and its pending animation
#[derive(Clone, Debug, PartialEq)]
pub struct LiveElement {
    /// Index within the category at the last pass
    pub slot: usize,
    /// Bound data
    pub datum: Datum,
    /// Settled attributes, or the end state of the running transition
    pub attrs: Attributes,
    pub tooltip: Vec<TooltipItem>,
    pub transition: Option<Transition>,
    pub exiting: bool,
}

impl LiveElement {
    fn entered(target: TargetElement) -> Self {
        Self {
            slot: target.slot,
            datum: target.datum,
            attrs: target.attrs,
            tooltip: target.tooltip,
            transition: None,
            exiting: false,
        }
    }

    /// Attributes at `now_ms`
    pub fn current(&self, now_ms: f64) -> Attributes {
        match &self.transition {
            Some(t) => t.sample(now_ms),
            None => self.attrs.clone(),
        }
    }

    /// Replace any running transition with one heading to `to`
    fn retarget(&mut self, now_ms: f64, to: Attributes, duration_ms: f64, easing: Easing, end: TransitionEnd) -> Attributes {
        let from = self.current(now_ms);
        self.transition = Some(Transition::new(from.clone(), to.clone(), now_ms, duration_ms, easing, end));
        self.attrs = to;
        self.exiting = end == TransitionEnd::Remove;
        from
    }
}

/// Per-group container of element layers
#[derive(Clone, Debug, Default)]
struct Container {
    offset_x: f64,
    width: f64,
    scale: Option<LinearScale>,
    layers: BTreeMap<ElementCategory, BTreeMap<ElementKey, LiveElement>>,
}

impl Container {
    fn is_empty(&self) -> bool {
        self.layers.values().all(BTreeMap::is_empty)
    }
}

/// Operation of one diff instruction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum DiffOp {
    /// Create the element at `attrs`
    Enter { attrs: Attributes },
    /// Animate an existing element
    Update {
        from: Attributes,
        to: Attributes,
        duration_ms: f64,
        easing: Easing,
    },
    /// Fade the element out, then remove it
    Exit {
        from: Attributes,
        to: Attributes,
        duration_ms: f64,
        easing: Easing,
    },
}

/// One entry of the render instruction stream
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffInstruction {
    pub id: ElementId,
    /// Horizontal offset of the owning container
    pub offset_x: f64,
    #[serde(flatten)]
    pub op: DiffOp,
    pub tooltip: Vec<TooltipItem>,
}

/// Counts of one diff pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub entered: usize,
    pub updated: usize,
    /// Newly exiting elements
    pub exited: usize,
    /// Exiting elements whose key came back (also counted as updated)
    pub revived: usize,
    /// Elements removed by the settle step at the end of the pass
    pub removed: usize,
}

impl DiffStats {
    fn absorb(&mut self, other: &DiffStats) {
        self.entered += other.entered;
        self.updated += other.updated;
        self.exited += other.exited;
        self.revived += other.revived;
        self.removed += other.removed;
    }
}

/// Output of one render pass
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderPass {
    pub now_ms: f64,
    pub instructions: Vec<DiffInstruction>,
    pub stats: DiffStats,
    pub by_category: BTreeMap<ElementCategory, DiffStats>,
}

impl RenderPass {
    /// Instructions of one category
    pub fn instructions_for(&self, category: ElementCategory) -> impl Iterator<Item = &DiffInstruction> {
        self.instructions
            .iter()
            .filter(move |i| i.id.category == category)
    }
}

/// Result of advancing transitions
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Transitions that reached their end and settled
    pub settled: usize,
    /// Elements removed after their exit finished
    pub removed: Vec<ElementId>,
    /// Transitions still running
    pub active: usize,
}

/// Snapshot of a live element at some instant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementView {
    pub id: ElementId,
    pub offset_x: f64,
    pub attrs: Attributes,
    pub tooltip: Vec<TooltipItem>,
    pub exiting: bool,
}

/// Inputs of one render pass
#[derive(Clone, Copy, Debug)]
pub struct RenderRequest<'a> {
    pub groups: &'a [GroupSummary],
    pub config: &'a ChartConfig,
    pub tooltips: &'a TooltipLabels,
    /// Horizontal placement of containers; `None` packs them by box width
    pub bands: Option<&'a BandScale>,
}

/// Keyed enter/update/exit reconciliation over live chart elements
#[derive(Clone, Debug, Default)]
pub struct RenderDiffEngine {
    containers: BTreeMap<String, Container>,
}

impl RenderDiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one diff pass at `now_ms`
    pub fn render(&mut self, now_ms: f64, request: &RenderRequest<'_>) -> RenderPass {
        let config = request.config;
        let mut pass = RenderPass {
            now_ms,
            ..RenderPass::default()
        };
        let mut present = BTreeSet::new();

        for (index, group) in request.groups.iter().enumerate() {
            present.insert(group.label.clone());

            let offset_x = request
                .bands
                .and_then(|b| b.position(&group.label))
                .unwrap_or(index as f64 * config.width());
            let scale = group_scale(group, config);

            let container = self.containers.entry(group.label.clone()).or_default();
            container.offset_x = offset_x;
            container.width = config.width();
            container.scale = Some(scale);

            let ctx = LayoutContext {
                group_label: &group.label,
                width: config.width(),
                scale,
                formatter: config.tick_formatter(),
                labels: request.tooltips,
                show_labels: config.show_labels(),
                show_data_points: config.show_data_points(),
            };

            for category in ElementCategory::ALL {
                let wanted = targets(category, group, &ctx);
                diff_layer(container, &group.label, category, wanted, &ctx, now_ms, config, &mut pass);
            }
        }

        // Containers whose group vanished: every element exits in place
        for (label, container) in self.containers.iter_mut() {
            if present.contains(label) {
                continue;
            }
            let scale = container
                .scale
                .unwrap_or_else(|| LinearScale::new([0.0, 1.0], [config.height(), 0.0]));
            let ctx = LayoutContext {
                group_label: label,
                width: container.width,
                scale,
                formatter: config.tick_formatter(),
                labels: request.tooltips,
                show_labels: config.show_labels(),
                show_data_points: config.show_data_points(),
            };
            for category in ElementCategory::ALL {
                diff_layer(container, label, category, Vec::new(), &ctx, now_ms, config, &mut pass);
            }
        }

        let settled = self.tick(now_ms);
        pass.stats.removed = settled.removed.len();
        for id in &settled.removed {
            pass.by_category.entry(id.category).or_default().removed += 1;
        }

        tracing::debug!(
            entered = pass.stats.entered,
            updated = pass.stats.updated,
            exited = pass.stats.exited,
            revived = pass.stats.revived,
            removed = pass.stats.removed,
            "render pass"
        );

        pass
    }

    /// Advance to `now_ms`: settle finished updates, drop finished exits
    pub fn tick(&mut self, now_ms: f64) -> TickReport {
        let mut report = TickReport::default();

        for (label, container) in self.containers.iter_mut() {
            for (category, layer) in container.layers.iter_mut() {
                layer.retain(|key, element| {
                    let Some(transition) = &element.transition else {
                        return true;
                    };
                    if !transition.is_finished(now_ms) {
                        report.active += 1;
                        return true;
                    }
                    if transition.end == TransitionEnd::Remove {
                        report.removed.push(ElementId::new(label.clone(), *category, *key));
                        return false;
                    }
                    element.attrs = transition.to.clone();
                    element.transition = None;
                    report.settled += 1;
                    true
                });
            }
        }

        self.containers.retain(|_, c| !c.is_empty());
        report
    }

    /// Drop every element immediately
    pub fn clear(&mut self) {
        self.containers.clear();
    }

    /// Number of live elements, exiting ones included
    pub fn len(&self) -> usize {
        self.containers
            .values()
            .flat_map(|c| c.layers.values())
            .map(BTreeMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live elements of one category
    pub fn count(&self, category: ElementCategory) -> usize {
        self.containers
            .values()
            .filter_map(|c| c.layers.get(&category))
            .map(BTreeMap::len)
            .sum()
    }

    /// Whether any transition is still running at `now_ms`
    pub fn is_animating(&self, now_ms: f64) -> bool {
        self.containers
            .values()
            .flat_map(|c| c.layers.values())
            .flat_map(BTreeMap::values)
            .any(|e| e.transition.as_ref().is_some_and(|t| !t.is_finished(now_ms)))
    }

    /// Look up one live element
    pub fn element(&self, id: &ElementId) -> Option<&LiveElement> {
        self.containers
            .get(&id.container)?
            .layers
            .get(&id.category)?
            .get(&id.key)
    }

    /// Every live element sampled at `now_ms`
    pub fn elements_at(&self, now_ms: f64) -> Vec<ElementView> {
        let mut views = Vec::new();
        for (label, container) in &self.containers {
            for (category, layer) in &container.layers {
                for (key, element) in layer {
                    views.push(ElementView {
                        id: ElementId::new(label.clone(), *category, *key),
                        offset_x: container.offset_x,
                        attrs: element.current(now_ms),
                        tooltip: element.tooltip.clone(),
                        exiting: element.exiting,
                    });
                }
            }
        }
        views
    }

    /// Labels of live containers
    pub fn containers(&self) -> impl Iterator<Item = &str> {
        self.containers.keys().map(String::as_str)
    }
}

/// Box scale of one group: overrides first, else `[min, max] -> [height, 0]`
fn group_scale(group: &GroupSummary, config: &ChartConfig) -> LinearScale {
    let domain = config.domain().unwrap_or([group.min, group.max]);
    let range = config.range().unwrap_or([config.height(), 0.0]);
    LinearScale::new(domain, range)
}

#[allow(clippy::too_many_arguments)]
fn diff_layer(
    container: &mut Container,
    label: &str,
    category: ElementCategory,
    wanted: Vec<TargetElement>,
    ctx: &LayoutContext<'_>,
    now_ms: f64,
    config: &ChartConfig,
    pass: &mut RenderPass,
) {
    let duration = config.transition_duration_ms();
    let easing = config.easing();
    let offset_x = container.offset_x;
    let layer = container.layers.entry(category).or_default();
    let mut stats = DiffStats::default();
    let mut seen = BTreeSet::new();

    for target in wanted {
        let id = ElementId::new(label, category, target.key);
        seen.insert(target.key);

        match layer.get_mut(&target.key) {
            None => {
                pass.instructions.push(DiffInstruction {
                    id,
                    offset_x,
                    op: DiffOp::Enter {
                        attrs: target.attrs.clone(),
                    },
                    tooltip: target.tooltip.clone(),
                });
                layer.insert(target.key, LiveElement::entered(target));
                stats.entered += 1;
            }
            Some(element) => {
                if element.exiting {
                    stats.revived += 1;
                }
                let from = element.retarget(now_ms, target.attrs.clone(), duration, easing, TransitionEnd::Keep);
                element.slot = target.slot;
                element.datum = target.datum;
                element.tooltip = target.tooltip.clone();
                pass.instructions.push(DiffInstruction {
                    id,
                    offset_x,
                    op: DiffOp::Update {
                        from,
                        to: target.attrs,
                        duration_ms: duration,
                        easing,
                    },
                    tooltip: target.tooltip,
                });
                stats.updated += 1;
            }
        }
    }

    for (key, element) in layer.iter_mut() {
        if seen.contains(key) {
            continue;
        }
        let to = project_exit(category, &element.datum, element.slot, ctx);
        // A running exit keeps its deadline; an unchanged one is left alone
        let duration_ms = match &element.transition {
            Some(running) if element.exiting && running.to == to => continue,
            Some(running) if element.exiting => (running.start_ms + running.duration_ms - now_ms).max(0.0),
            _ => {
                stats.exited += 1;
                duration
            }
        };
        let from = element.retarget(now_ms, to.clone(), duration_ms, easing, TransitionEnd::Remove);
        pass.instructions.push(DiffInstruction {
            id: ElementId::new(label, category, *key),
            offset_x,
            op: DiffOp::Exit {
                from,
                to,
                duration_ms,
                easing,
            },
            tooltip: element.tooltip.clone(),
        });
    }

    pass.stats.absorb(&stats);
    pass.by_category.entry(category).or_default().absorb(&stats);
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxwhisker_stats::{QuantileConfig, SummaryEngine};

    fn summaries(groups: &[(&str, &[f64])]) -> Vec<GroupSummary> {
        let engine = SummaryEngine::new(QuantileConfig::default()).unwrap();
        groups
            .iter()
            .filter_map(|(label, values)| engine.summarize_grouped(*label, values))
            .collect()
    }

    fn config(duration: f64) -> ChartConfig {
        let mut config = ChartConfig::new();
        config
            .set_width(40.0)
            .set_height(100.0)
            .set_domain(Some([0.0, 100.0]))
            .set_transition_duration_ms(duration)
            .set_easing(Easing::Linear);
        config
    }

    fn run(engine: &mut RenderDiffEngine, now: f64, groups: &[GroupSummary], config: &ChartConfig) -> RenderPass {
        let labels = TooltipLabels::default();
        engine.render(
            now,
            &RenderRequest {
                groups,
                config,
                tooltips: &labels,
                bands: None,
            },
        )
    }

    #[test]
    fn test_first_pass_enters_everything() {
        let groups = summaries(&[("a", &[10.0, 20.0, 30.0, 40.0, 50.0])]);
        let mut engine = RenderDiffEngine::new();
        let pass = run(&mut engine, 0.0, &groups, &config(100.0));

        assert_eq!(pass.stats.updated, 0);
        assert_eq!(pass.stats.exited, 0);
        assert_eq!(pass.stats.entered, engine.len());
        assert!(pass
            .instructions
            .iter()
            .all(|i| matches!(i.op, DiffOp::Enter { .. })));
        assert_eq!(engine.count(ElementCategory::Box), 1);
        assert_eq!(engine.count(ElementCategory::BoxTick), 3);
        assert_eq!(engine.count(ElementCategory::WhiskerLine), 2);
    }

    #[test]
    fn test_second_identical_pass_only_updates() {
        let groups = summaries(&[("a", &[10.0, 20.0, 30.0, 40.0, 50.0]), ("b", &[1.0, 5.0])]);
        let mut engine = RenderDiffEngine::new();
        let cfg = config(100.0);
        let first = run(&mut engine, 0.0, &groups, &cfg);
        let second = run(&mut engine, 10.0, &groups, &cfg);

        assert_eq!(second.stats.entered, 0);
        assert_eq!(second.stats.exited, 0);
        assert_eq!(second.stats.updated, first.stats.entered);
    }

    #[test]
    fn test_removed_group_exits_then_disappears() {
        let cfg = config(100.0);
        let both = summaries(&[("a", &[10.0, 20.0, 30.0]), ("b", &[1.0, 5.0])]);
        let only_a = summaries(&[("a", &[10.0, 20.0, 30.0])]);
        let mut engine = RenderDiffEngine::new();
        run(&mut engine, 0.0, &both, &cfg);
        let b_count = engine.elements_at(0.0).iter().filter(|e| e.id.container == "b").count();

        let pass = run(&mut engine, 200.0, &only_a, &cfg);
        assert_eq!(pass.stats.exited, b_count);
        assert!(engine.containers().any(|c| c == "b"));

        let mid = engine.elements_at(250.0);
        let fading = mid.iter().find(|e| e.id.container == "b").unwrap();
        assert!(fading.exiting);
        let opacity = fading.attrs.get(Attr::Opacity).unwrap();
        assert!(opacity < 1.0 && opacity > FADED_OPACITY);

        let report = engine.tick(300.0);
        assert_eq!(report.removed.len(), b_count);
        assert!(!engine.containers().any(|c| c == "b"));
    }

    #[test]
    fn test_zero_duration_exit_removed_in_pass() {
        let cfg = config(0.0);
        let mut engine = RenderDiffEngine::new();
        run(&mut engine, 0.0, &summaries(&[("a", &[1.0, 2.0]), ("b", &[3.0])]), &cfg);
        let pass = run(&mut engine, 1.0, &summaries(&[("a", &[1.0, 2.0])]), &cfg);
        assert_eq!(pass.stats.removed, pass.stats.exited);
        assert!(engine.elements_at(1.0).iter().all(|e| e.id.container == "a"));
    }

    #[test]
    fn test_update_interrupt_retargets_from_current() {
        let cfg = config(100.0);
        let mut engine = RenderDiffEngine::new();
        let id = ElementId::new("a", ElementCategory::MedianLine, ElementKey::Slot(0));

        run(&mut engine, 0.0, &summaries(&[("a", &[0.0, 20.0, 40.0])]), &cfg);
        assert_eq!(engine.element(&id).unwrap().attrs.get(Attr::Y1), Some(80.0));

        // Median 20 -> 60 over 100ms; interrupt halfway
        run(&mut engine, 0.0, &summaries(&[("a", &[40.0, 60.0, 80.0])]), &cfg);
        let halfway = engine.element(&id).unwrap().current(50.0);
        assert_eq!(halfway.get(Attr::Y1), Some(60.0));

        // New target: median 40; the transition restarts from y1 = 60
        let pass = run(&mut engine, 50.0, &summaries(&[("a", &[20.0, 40.0, 60.0])]), &cfg);
        let update = pass
            .instructions_for(ElementCategory::MedianLine)
            .next()
            .unwrap();
        match &update.op {
            DiffOp::Update { from, to, .. } => {
                assert_eq!(from.get(Attr::Y1), Some(60.0));
                assert_eq!(to.get(Attr::Y1), Some(60.0));
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_exiting_element_revived() {
        let cfg = config(100.0);
        let mut engine = RenderDiffEngine::new();
        let with_b = summaries(&[("a", &[10.0]), ("b", &[20.0])]);
        let without_b = summaries(&[("a", &[10.0])]);

        run(&mut engine, 0.0, &with_b, &cfg);
        let exit_pass = run(&mut engine, 0.0, &without_b, &cfg);
        assert!(exit_pass.stats.exited > 0);

        let revive = run(&mut engine, 50.0, &with_b, &cfg);
        assert_eq!(revive.stats.entered, 0);
        assert_eq!(revive.stats.revived, exit_pass.stats.exited);

        engine.tick(200.0);
        let views = engine.elements_at(200.0);
        assert!(views.iter().any(|e| e.id.container == "b"));
        assert!(views.iter().all(|e| !e.exiting));
        assert!(views.iter().all(|e| e.attrs.get(Attr::Opacity) == Some(1.0)));
    }

    #[test]
    fn test_fast_cycles_let_exits_finish() {
        let cfg = config(100.0);
        let mut engine = RenderDiffEngine::new();
        let after = summaries(&[("a", &[1.0, 2.0, 4.0])]);
        run(&mut engine, 0.0, &summaries(&[("a", &[1.0, 2.0, 3.0])]), &cfg);
        assert!(run(&mut engine, 10.0, &after, &cfg).stats.exited > 0);

        // Identical cycles every 40ms, faster than the exit itself
        let mut now = 10.0;
        while now < 200.0 {
            now += 40.0;
            let pass = run(&mut engine, now, &after, &cfg);
            assert_eq!(pass.stats.exited, 0);
            assert!(pass
                .instructions
                .iter()
                .all(|i| !matches!(i.op, DiffOp::Exit { .. })));
        }
        assert!(engine.elements_at(now).iter().all(|e| !e.exiting));
    }

    #[test]
    fn test_retargeted_exit_keeps_deadline() {
        let mut cfg = config(100.0);
        cfg.set_domain(None);
        let mut engine = RenderDiffEngine::new();
        let id = ElementId::new("a", ElementCategory::OutlierPoint, ElementKey::value(3.0, 0));

        run(&mut engine, 0.0, &summaries(&[("a", &[1.0, 2.0, 3.0])]), &cfg);
        run(&mut engine, 10.0, &summaries(&[("a", &[1.0, 2.0, 4.0])]), &cfg);
        assert!(engine.element(&id).unwrap().exiting);

        // The group scale stretches, so the fading point gets a new end state
        let pass = run(&mut engine, 60.0, &summaries(&[("a", &[1.0, 2.0, 5.0])]), &cfg);
        let exit = pass.instructions.iter().find(|i| i.id == id).unwrap();
        match &exit.op {
            DiffOp::Exit { duration_ms, .. } => assert_eq!(*duration_ms, 50.0),
            other => panic!("expected exit, got {other:?}"),
        }

        engine.tick(110.0);
        assert!(engine.element(&id).is_none());
    }

    #[test]
    fn test_changed_outliers_enter_and_exit() {
        let cfg = config(0.0);
        let mut engine = RenderDiffEngine::new();
        let first = run(&mut engine, 0.0, &summaries(&[("a", &[1.0, 2.0, 3.0])]), &cfg);
        assert!(first.by_category[&ElementCategory::OutlierPoint].entered > 0);

        let second = run(&mut engine, 1.0, &summaries(&[("a", &[1.0, 2.0, 4.0])]), &cfg);
        let outliers = second.by_category[&ElementCategory::OutlierPoint];
        // 3 leaves, 4 arrives; 1 stays
        assert_eq!(outliers.entered, 2);
        assert_eq!(outliers.exited, 2);
        assert_eq!(outliers.updated, 2);
    }

    #[test]
    fn test_tooltips_travel_with_instructions() {
        let groups = summaries(&[("a", &[10.0, 20.0, 30.0])]);
        let mut engine = RenderDiffEngine::new();
        let pass = run(&mut engine, 0.0, &groups, &config(0.0));
        let boxed = pass.instructions_for(ElementCategory::Box).next().unwrap();
        assert_eq!(boxed.tooltip.len(), 3);
        let mean = pass.instructions_for(ElementCategory::MeanPoint).next().unwrap();
        assert_eq!(mean.tooltip[0].display_name, "Mean");
    }

    #[test]
    fn test_band_offsets() {
        let groups = summaries(&[("a", &[1.0]), ("b", &[2.0])]);
        let bands = BandScale::new(vec!["a".into(), "b".into()], 230.0);
        let labels = TooltipLabels::default();
        let cfg = config(0.0);
        let mut engine = RenderDiffEngine::new();
        let pass = engine.render(
            0.0,
            &RenderRequest {
                groups: &groups,
                config: &cfg,
                tooltips: &labels,
                bands: Some(&bands),
            },
        );
        let b = pass.instructions.iter().find(|i| i.id.container == "b").unwrap();
        assert_eq!(b.offset_x, 157.0);
    }

    #[test]
    fn test_clear() {
        let groups = summaries(&[("a", &[1.0, 2.0])]);
        let mut engine = RenderDiffEngine::new();
        run(&mut engine, 0.0, &groups, &config(0.0));
        assert!(!engine.is_empty());
        engine.clear();
        assert!(engine.is_empty());
    }
}
