//! boxwhisker-core - Box-and-whisker chart engine
//!
//! This crate turns host tables into animated box plots. Statistics come from
//! `boxwhisker-stats`; everything between the numbers and the drawn shapes
//! lives here.
//!
//! # Key Components
//!
//! - **Input**: categorical host tables, filtered by time bucket and transposed
//! - **Scale**: adaptive box and y-axis scales anchored on the median of medians
//! - **Axis**: y-axis ticks, title and goal line
//! - **Diff**: keyed enter/update/exit reconciliation with timed transitions
//! - **Chart**: the render cycle tying the above together
//!
//! # Render Cycle
//!
//! ```text
//! CategoricalInput -> GroupSummary[] -> PlotDataset -> ScaleMapping
//!                  -> RenderDiffEngine::render -> ChartFrame
//! ```
//!
//! Time is never read from a clock: callers pass `now_ms` into
//! [`BoxWhiskerChart::update`] and [`BoxWhiskerChart::tick`].

pub mod axis;
pub mod chart;
pub mod config;
pub mod diff;
pub mod error;
pub mod format;
pub mod input;
pub mod scale;
pub mod settings;
pub mod tooltip;

pub use axis::*;
pub use chart::*;
pub use config::*;
pub use error::*;
pub use format::*;
pub use input::*;
pub use scale::*;
pub use settings::*;
pub use tooltip::*;

// diff exports many small element types, access via diff:: prefix
pub use diff::{DiffInstruction, DiffOp, DiffStats, Easing, RenderDiffEngine, RenderPass, RenderRequest, TickReport};
