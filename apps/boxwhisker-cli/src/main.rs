//! boxwhisker - render box plot frames from the command line
//!
//! Reads a categorical table as JSON, runs one render cycle and prints the
//! resulting frame (or the raw summaries) as JSON.
//!
//! ```text
//! boxwhisker data.json --settings chart.toml --width 800 --height 400
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use boxwhisker_core::{BoxPlotSettings, BoxWhiskerChart, CategoricalInput, ChartError, Viewport};

#[derive(Parser, Debug)]
#[command(name = "boxwhisker", version, about = "Render box-and-whisker frames as JSON")]
struct Args {
    /// Categorical table as JSON (`{"categories": [...], "series": [...]}`)
    dataset: PathBuf,

    /// Chart settings, JSON or TOML by extension
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 400.0)]
    height: f64,

    /// Print per-group summaries (duplicates kept) instead of a frame
    #[arg(long)]
    summaries: bool,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid dataset: {0}")]
    Dataset(#[source] serde_json::Error),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("Failed to encode output: {0}")]
    Output(#[source] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "boxwhisker failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, CliError> {
    let settings = match &args.settings {
        Some(path) => BoxPlotSettings::load(path)?,
        None => BoxPlotSettings::default(),
    };

    let text = std::fs::read_to_string(&args.dataset).map_err(|source| CliError::Io {
        path: args.dataset.clone(),
        source,
    })?;
    let input: CategoricalInput = serde_json::from_str(&text).map_err(CliError::Dataset)?;
    tracing::info!(
        categories = input.categories.len(),
        columns = input.active_columns(settings.time_bucket),
        "dataset loaded"
    );

    let bucket = settings.time_bucket;
    let mut chart = BoxWhiskerChart::new(settings);

    if args.summaries {
        let groups = input.extract(bucket).map_err(ChartError::from)?;
        let summaries = chart.summarize_points(&groups)?;
        return encode(&summaries, args.pretty);
    }

    let frame = chart.update(&input, Viewport::new(args.width, args.height), 0.0)?;
    encode(&frame, args.pretty)
}

fn encode<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let encoded = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    encoded.map_err(CliError::Output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["boxwhisker", "data.json"]);
        assert_eq!(args.dataset, PathBuf::from("data.json"));
        assert!(args.settings.is_none());
        assert_eq!(args.width, 800.0);
        assert!(!args.summaries);
    }

    #[test]
    fn test_missing_dataset_is_io_error() {
        let args = Args::parse_from(["boxwhisker", "/nonexistent/boxwhisker.json"]);
        assert!(matches!(run(&args), Err(CliError::Io { .. })));
    }
}
