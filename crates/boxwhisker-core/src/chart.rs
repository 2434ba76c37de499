//! The box-and-whisker chart pipeline
//!
//! One [`BoxWhiskerChart::update`] call is one render cycle:
//!
//! 1. validate the quantile settings
//! 2. extract the active observations from the host table
//! 3. summarize every non-empty category
//! 4. derive the plot size, scales, band layout and y-axis
//! 5. diff the new element sets against the live ones
//!
//! A cycle either completes or is rejected as a whole. A rejected cycle drops
//! every live element and leaves exactly one warning behind.

use serde::{Deserialize, Serialize};

use boxwhisker_stats::{GroupSummary, SummaryEngine};

use crate::axis::YAxis;
use crate::config::ChartConfig;
use crate::diff::{RenderDiffEngine, RenderPass, RenderRequest, TickReport};
use crate::error::{ChartError, ChartResult, ChartWarning};
use crate::input::{CategoricalInput, GroupObservations};
use crate::scale::{compute_scales, BandScale, PlotDataset, ScaleMapping};
use crate::settings::BoxPlotSettings;
use crate::tooltip::TooltipLabels;

/// Smallest plot height in pixels
pub const MIN_PLOT_HEIGHT: f64 = 100.0;

/// Smallest horizontal space per group in pixels
pub const MIN_GROUP_WIDTH: f64 = 100.0;

/// Vertical room kept free below the x-axis labels
const BOTTOM_SLACK: f64 = 8.0;

/// Size of the host viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Space reserved around the plot area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 5.0,
            right: 5.0,
            bottom: 40.0,
            left: 50.0,
        }
    }
}

/// Everything produced by one successful render cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFrame {
    pub dataset: PlotDataset,
    /// `None` when nothing was drawable
    pub scale: Option<ScaleMapping>,
    pub bands: Option<BandScale>,
    pub y_axis: Option<YAxis>,
    pub pass: RenderPass,
    /// Plot width in pixels
    pub width: f64,
    /// Plot height in pixels
    pub height: f64,
    pub margin: Margin,
}

impl ChartFrame {
    /// Whether the cycle drew no group
    pub fn is_empty(&self) -> bool {
        self.dataset.groups.is_empty()
    }
}

/// Plot height for a viewport
pub fn plot_height(viewport: &Viewport, margin: &Margin) -> f64 {
    (viewport.height - margin.top - margin.bottom - BOTTOM_SLACK).max(MIN_PLOT_HEIGHT)
}

/// Plot width for a viewport and group count
pub fn plot_width(viewport: &Viewport, margin: &Margin, groups: usize) -> f64 {
    (viewport.width - margin.left - margin.right).max(MIN_GROUP_WIDTH * groups as f64)
}

/// Box-and-whisker chart with incremental rendering
#[derive(Debug, Clone)]
pub struct BoxWhiskerChart {
    settings: BoxPlotSettings,
    config: ChartConfig,
    margin: Margin,
    engine: RenderDiffEngine,
    warnings: Vec<ChartWarning>,
}

impl Default for BoxWhiskerChart {
    fn default() -> Self {
        Self::new(BoxPlotSettings::default())
    }
}

impl BoxWhiskerChart {
    /// Create a chart with the given settings and a default configuration
    pub fn new(settings: BoxPlotSettings) -> Self {
        Self::with_config(settings, ChartConfig::default())
    }

    /// Create a chart with an explicit configuration
    ///
    /// Display toggles and the transition duration come from `settings`;
    /// everything else (formatter, strategies, easing, scale overrides) from
    /// `config`.
    pub fn with_config(settings: BoxPlotSettings, config: ChartConfig) -> Self {
        Self {
            settings,
            config,
            margin: Margin::default(),
            engine: RenderDiffEngine::new(),
            warnings: Vec::new(),
        }
    }

    pub fn settings(&self) -> &BoxPlotSettings {
        &self.settings
    }

    /// Replace the settings; takes effect on the next cycle
    pub fn set_settings(&mut self, settings: BoxPlotSettings) {
        self.settings = settings;
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ChartConfig {
        &mut self.config
    }

    pub fn margin(&self) -> Margin {
        self.margin
    }

    pub fn set_margin(&mut self, margin: Margin) {
        self.margin = margin;
    }

    /// Warnings raised by the last cycle
    pub fn warnings(&self) -> &[ChartWarning] {
        &self.warnings
    }

    /// The live element registry
    pub fn engine(&self) -> &RenderDiffEngine {
        &self.engine
    }

    /// Advance running transitions to `now_ms`
    pub fn tick(&mut self, now_ms: f64) -> TickReport {
        self.engine.tick(now_ms)
    }

    /// Run one render cycle
    pub fn update(&mut self, input: &CategoricalInput, viewport: Viewport, now_ms: f64) -> ChartResult<ChartFrame> {
        self.warnings.clear();

        match self.run(input, viewport, now_ms) {
            Ok(frame) => Ok(frame),
            Err(err) => {
                tracing::warn!(error = %err, "render cycle rejected");
                self.engine.clear();
                self.warnings.push(err.warning());
                Err(err)
            }
        }
    }

    fn run(&mut self, input: &CategoricalInput, viewport: Viewport, now_ms: f64) -> ChartResult<ChartFrame> {
        let quantiles = self.settings.quantile_config();
        let stats = SummaryEngine::new(quantiles)?;

        let observations = input.extract(self.settings.time_bucket)?;
        let groups: Vec<GroupSummary> = observations
            .iter()
            .filter_map(|g| stats.summarize_grouped(g.label.as_str(), &g.values))
            .collect();

        let dataset = PlotDataset::new(groups)
            .with_y_axis_title(self.settings.y_title.clone())
            .with_goal(self.settings.goal);

        let margin = self.margin;
        let height = plot_height(&viewport, &margin);
        let width = plot_width(&viewport, &margin, dataset.groups.len());

        let mut config = self.config.snapshot();
        self.settings.apply_to(&mut config);
        config.set_height(height);
        let tooltips = TooltipLabels::from_config(&quantiles);

        if dataset.groups.is_empty() {
            tracing::debug!("no drawable group");
            let pass = self.engine.render(
                now_ms,
                &RenderRequest {
                    groups: &dataset.groups,
                    config: &config,
                    tooltips: &tooltips,
                    bands: None,
                },
            );
            return Ok(ChartFrame {
                dataset,
                scale: None,
                bands: None,
                y_axis: None,
                pass,
                width,
                height,
                margin,
            });
        }

        let mapping = compute_scales(&dataset, height, margin.top)?;
        let bands = BandScale::new(dataset.labels(), width);

        config.set_width(bands.bandwidth());
        if config.domain().is_none() {
            config.set_domain(Some(mapping.box_domain));
        }
        if config.range().is_none() {
            config.set_range(Some(mapping.box_range));
        }

        let y_axis = YAxis::layout(
            &mapping,
            config.tick_formatter(),
            &dataset.y_axis_title,
            dataset.goal,
            width,
            height + margin.top + margin.bottom,
        );

        let pass = self.engine.render(
            now_ms,
            &RenderRequest {
                groups: &dataset.groups,
                config: &config,
                tooltips: &tooltips,
                bands: Some(&bands),
            },
        );

        tracing::debug!(
            groups = dataset.groups.len(),
            width,
            height,
            median_share = mapping.median_share,
            live = self.engine.len(),
            "render cycle complete"
        );

        Ok(ChartFrame {
            dataset,
            scale: Some(mapping),
            bands: Some(bands),
            y_axis: Some(y_axis),
            pass,
            width,
            height,
            margin,
        })
    }

    /// Summarize raw groups through the configured strategies
    ///
    /// Duplicates are kept and the whisker and quartile strategies of the
    /// chart configuration apply. Empty groups are skipped.
    pub fn summarize_points(&self, groups: &[GroupObservations]) -> ChartResult<Vec<GroupSummary>> {
        let stats = SummaryEngine::new(self.settings.quantile_config())?
            .with_quartile_strategy(self.config.quartile_strategy().clone())
            .with_whisker_strategy(self.config.whisker_strategy().clone());

        Ok(groups
            .iter()
            .enumerate()
            .filter_map(|(i, g)| stats.summarize_points(i, g.label.as_str(), &g.values))
            .collect())
    }
}
