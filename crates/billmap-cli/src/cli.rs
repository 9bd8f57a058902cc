//! CLI argument definitions for the billing column mapper.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "billmap",
    version,
    about = "Map cloud-billing CSV columns onto the FOCUS schema",
    long_about = "Map cloud-billing CSV columns onto the FOCUS schema.\n\n\
                  Confirmed mappings are reused per tenant and provider; other columns\n\
                  are scored, and high-confidence matches are confirmed automatically."
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

    /// TOML scoring config (weights and thresholds). Omitted keys keep defaults.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// TOML lookup tables replacing the embedded canonical, alias and vocabulary tables.
    #[arg(long = "tables", value_name = "PATH", global = true)]
    pub tables: Option<PathBuf>,

    /// Use stricter thresholds: fewer suggestions, fewer automatic mappings.
    #[arg(long = "strict", global = true)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the internal schema fields.
    Fields,

    /// Score columns of a CSV file without touching any store.
    Suggest(SuggestArgs),

    /// Run the full upload pipeline against a mapping store.
    Ingest(IngestArgs),

    /// Show how confirmed mappings resolve against a CSV header row.
    Resolve(ResolveArgs),
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Billing CSV file.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Number of data rows sampled for profiling.
    #[arg(long = "sample", value_name = "N", default_value_t = 200)]
    pub sample: usize,

    /// Print suggestions as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

/// Tenant, provider and store location shared by stateful commands.
#[derive(Args)]
pub struct StoreArgs {
    /// Tenant that owns the upload.
    #[arg(long = "tenant", value_name = "TENANT")]
    pub tenant: String,

    /// Billing provider (e.g. AWS, GCP, Azure).
    #[arg(long = "provider", value_name = "PROVIDER")]
    pub provider: String,

    /// Directory of the JSON mapping store.
    #[arg(long = "store", value_name = "DIR")]
    pub store: PathBuf,
}

#[derive(Args)]
pub struct IngestArgs {
    /// Billing CSV file.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Upload identifier (default: random UUID).
    #[arg(long = "upload-id", value_name = "ID")]
    pub upload_id: Option<String>,

    /// Number of data rows sampled for profiling.
    #[arg(long = "sample", value_name = "N", default_value_t = 200)]
    pub sample: usize,

    /// Write every row projected onto the internal schema to this CSV file.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the outcome as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Billing CSV file (only the header row is read).
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Print the resolved mapping as JSON.
    #[arg(long = "json")]
    pub json: bool,
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
