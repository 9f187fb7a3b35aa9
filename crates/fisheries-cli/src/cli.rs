//! CLI argument definitions for the fisheries cleaning pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fisheries-pipeline",
    version,
    about = "Fisheries exchange-value cleaning pipeline",
    long_about = "Validate and clean the commercial and non-commercial fisheries\n\
                  exchange-value datasets.\n\n\
                  Each dataset is checked against its schema contract, coerced,\n\
                  stripped of rows that would corrupt aggregation, and exported\n\
                  alongside a combined audit summary."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean both fisheries datasets and write the combined summary.
    Clean(CleanArgs),

    /// Show the per-dataset schema contracts.
    Contracts,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Directory holding the pre-tidied source CSV files.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output directory for cleaned files (default: <INPUT_DIR>/cleaned).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Keep rollup rows ("All Ecosystems" / "All Species").
    ///
    /// By default rollup rows are removed because they double-count when
    /// per-category totals are summed. Keep them to reconcile category
    /// sums against the rollups.
    #[arg(long = "keep-aggregates")]
    pub keep_aggregates: bool,

    /// Drop presentation-only columns from the exported files.
    #[arg(long = "remove-display")]
    pub remove_display: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
