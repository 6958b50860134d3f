//! CLI argument definitions for the `ddmrp` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use ddmrp_ingest::{DEFAULT_BACKOFF_BASE, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
use ddmrp_model::{BufferStatus, ExportFormat};

#[derive(Parser)]
#[command(
    name = "ddmrp",
    version,
    about = "DDMRP buffer calculator - replenishment signals from a trade matrix and a stock snapshot",
    long_about = "Compute DDMRP buffer status for every SKU and store.\n\n\
                  The trade matrix (zone sizes) comes from a shared spreadsheet link or a\n\
                  local CSV export; the stock snapshot is a local CSV export."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

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
    /// Compute buffers, print the order list, and export the tables.
    Compute(ComputeArgs),

    /// Print the CSV export link derived from a spreadsheet link.
    ExportUrl {
        /// Spreadsheet link as copied from the browser.
        #[arg(value_name = "URL")]
        url: String,
    },

    /// List buffer statuses with their priorities.
    Statuses,
}

#[derive(Args)]
#[group(id = "matrix", required = true, multiple = false)]
pub struct MatrixSource {
    /// Shared spreadsheet link of the trade matrix.
    #[arg(long = "matrix-url", value_name = "URL")]
    pub url: Option<String>,

    /// Local CSV export of the trade matrix.
    #[arg(long = "matrix-file", value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct FetchArgs {
    /// Total download attempts for the matrix link.
    #[arg(long = "max-retries", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Timeout of one download attempt in seconds.
    #[arg(long = "timeout-secs", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Base of the exponential backoff between attempts, in seconds.
    #[arg(long = "backoff-base", default_value_t = DEFAULT_BACKOFF_BASE)]
    pub backoff_base: u32,
}

#[derive(Parser)]
pub struct ComputeArgs {
    #[command(flatten)]
    pub matrix: MatrixSource,

    /// Stock snapshot (CSV, semicolon or tab separated).
    #[arg(long = "stock", value_name = "PATH")]
    pub stock: PathBuf,

    /// Directory for exported files (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Export file format.
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: FormatArg,

    /// Only show and export these stores (repeatable).
    #[arg(long = "store", value_name = "STORE_ID")]
    pub stores: Vec<String>,

    /// Only show and export these statuses (repeatable: red, yellow, green, excess, n/a).
    #[arg(long = "status", value_name = "STATUS", value_parser = parse_status)]
    pub statuses: Vec<BufferStatus>,

    /// Case-insensitive search in article and description.
    #[arg(long = "search", value_name = "TEXT")]
    pub search: Option<String>,

    /// Show only the N largest orders.
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,

    /// Compute and print without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

fn parse_status(raw: &str) -> Result<BufferStatus, String> {
    raw.parse::<BufferStatus>().map_err(|err| err.to_string())
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
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
