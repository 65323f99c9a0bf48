//! Command-line parsing for the overload curve tool.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! ingest and query code. Flags resolve into plain config values
//! (`SourceConfig`, `OverloadFilter`) that the rest of the crate understands.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::chart::{AxisRange, AxisScale};
use crate::data::SourceConfig;
use crate::report::TimeWindow;
use crate::select::OverloadFilter;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "overload", version, about = "Overload time-current curve explorer")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List curves grouped by device type.
    List(QueryArgs),
    /// Print per-curve statistics (max/average current, peak point).
    Summary(SummaryArgs),
    /// Print the distinct types, voltages and ratings available for filtering.
    Facets(SourceArgs),
    /// Write chart series JSON for the selected curves.
    Series(SeriesArgs),
    /// Write every sample of the selected curves as CSV.
    Export(ExportArgs),
}

/// Where to read the overload CSV from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Read a local CSV file instead of fetching.
    #[arg(long, value_name = "PATH", conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// CSV URL. Falls back to `OVERLOAD_CSV_URL`, then the published spreadsheet.
    #[arg(long)]
    pub url: Option<String>,

    /// HTTP timeout in seconds. Falls back to `OVERLOAD_HTTP_TIMEOUT_SECS`.
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl SourceArgs {
    pub fn to_config(&self) -> SourceConfig {
        SourceConfig::resolve(self.file.clone(), self.url.clone(), self.timeout)
    }
}

/// Curve selection options.
#[derive(Debug, Args, Clone, Default)]
pub struct FilterArgs {
    /// Keep curves of this type (repeatable).
    #[arg(long = "type", value_name = "TYPE")]
    pub types: Vec<String>,

    /// Keep curves with this voltage (repeatable).
    #[arg(long = "voltage", value_name = "VOLTAGE")]
    pub voltages: Vec<String>,

    /// Keep curves with this rating (repeatable).
    #[arg(long = "rating", value_name = "RATING")]
    pub ratings: Vec<String>,

    /// Select a curve by its exact label, e.g. "Acme F1" (repeatable).
    #[arg(long = "label", value_name = "LABEL")]
    pub labels: Vec<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> OverloadFilter {
        OverloadFilter {
            types: self.types.clone(),
            voltages: self.voltages.clone(),
            ratings: self.ratings.clone(),
            labels: self.labels.clone(),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Start of a time window (inclusive) to count samples in.
    #[arg(long, requires = "to")]
    pub from: Option<f64>,

    /// End of the time window (inclusive).
    #[arg(long, requires = "from")]
    pub to: Option<f64>,
}

impl SummaryArgs {
    pub fn window(&self) -> Option<TimeWindow> {
        match (self.from, self.to) {
            (Some(start), Some(end)) => Some(TimeWindow { start, end }),
            _ => None,
        }
    }
}

/// Axis scale as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScaleArg {
    Linear,
    Log,
}

impl From<ScaleArg> for AxisScale {
    fn from(value: ScaleArg) -> Self {
        match value {
            ScaleArg::Linear => AxisScale::Linear,
            ScaleArg::Log => AxisScale::Logarithmic,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Time axis scale.
    #[arg(long, value_enum, default_value_t = ScaleArg::Log)]
    pub x_scale: ScaleArg,

    /// Current axis scale.
    #[arg(long, value_enum, default_value_t = ScaleArg::Linear)]
    pub y_scale: ScaleArg,

    /// Time axis minimum (blank = auto).
    #[arg(long)]
    pub x_min: Option<String>,

    /// Time axis maximum (blank = auto).
    #[arg(long)]
    pub x_max: Option<String>,

    /// Current axis minimum (blank = auto).
    #[arg(long)]
    pub y_min: Option<String>,

    /// Current axis maximum (blank = auto).
    #[arg(long)]
    pub y_max: Option<String>,

    /// Write to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

impl SeriesArgs {
    pub fn x_range(&self) -> AxisRange {
        AxisRange::from_inputs(self.x_min.as_deref(), self.x_max.as_deref())
    }

    pub fn y_range(&self) -> AxisRange {
        AxisRange::from_inputs(self.y_min.as_deref(), self.y_max.as_deref())
    }
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Write to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}
