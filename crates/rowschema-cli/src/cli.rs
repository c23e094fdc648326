//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rowschema",
    version,
    about = "Compile dataset definitions and validate tabular data against them",
    long_about = "Compile a JSON dataset definition into a record validator.\n\n\
                  Every CSV row is renamed, defaulted and coerced according to the\n\
                  definition; rows that fail are reported field by field."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

    /// Allow raw cell values to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate every row of a CSV file against a dataset definition.
    Validate(ValidateArgs),

    /// Show the fields of a dataset definition and check that it compiles.
    Describe(DescribeArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Dataset definition (JSON).
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// CSV file with a header row.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Write valid records as JSON lines to this file.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Field delimiter.
    #[arg(long = "delimiter", default_value_t = ',')]
    pub delimiter: char,

    /// Maximum number of failing records listed in the error table.
    #[arg(long = "max-errors", default_value_t = 20)]
    pub max_errors: usize,
}

#[derive(Parser)]
pub struct DescribeArgs {
    /// Dataset definition (JSON).
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,
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
