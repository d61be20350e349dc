//! Command line arguments for netverify.
//!
//! Parsed with clap derive. Environment overrides:
//! - `NETVERIFY_CATALOG`: catalog path
//! - `NETVERIFY_FORMAT`: output format
//! - `NO_COLOR`: disable colors (read by the binary)

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Verify network device state against a catalog of expectations.
#[derive(Debug, Parser)]
#[command(name = "netverify", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Debug logging on stderr and per-check durations in text output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Command to execute
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run catalog checks against device output snapshots
    Check(CheckArgs),
    /// List all available checks
    List(ListArgs),
    /// Render the commands a catalog needs from each device
    Commands(RenderArgs),
    /// Validate catalog inputs without evaluating anything
    Validate(ValidateArgs),
    /// Print version information
    Version,
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
    /// JUnit XML for CI/CD integration
    Junit,
}

/// Check category filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CategoryFilter {
    /// Run all checks
    #[default]
    All,
    /// Run only interface checks
    Interfaces,
    /// Run only VLAN checks
    Vlan,
    /// Run only services checks
    Services,
    /// Run only STUN checks
    Stun,
    /// Run only BFD checks
    Bfd,
    /// Run only management security checks
    Security,
}

/// Which catalog entries to consider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct SelectionArgs {
    /// Category filter
    #[arg(long, value_enum, default_value_t = CategoryFilter::All)]
    pub category: CategoryFilter,

    /// Skip a check by name (repeatable)
    #[arg(long, value_name = "CHECK")]
    pub skip: Vec<String>,

    /// Run only this check (repeatable)
    #[arg(long, value_name = "CHECK")]
    pub only: Vec<String>,
}

/// How results are printed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "NETVERIFY_FORMAT")]
    pub format: OutputFormat,

    /// Only output failures and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Catalog file (YAML)
    #[arg(short, long, env = "NETVERIFY_CATALOG")]
    pub catalog: PathBuf,

    /// Device output snapshot files (JSON), one per device
    #[arg(required = true, value_name = "SNAPSHOT")]
    pub snapshots: Vec<PathBuf>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Stop on first failure
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Category filter
    #[arg(long, value_enum, default_value_t = CategoryFilter::All)]
    pub category: CategoryFilter,

    /// Output format (junit prints as text)
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "NETVERIFY_FORMAT")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Catalog file (YAML)
    #[arg(short, long, env = "NETVERIFY_CATALOG")]
    pub catalog: PathBuf,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format (junit prints as text)
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "NETVERIFY_FORMAT")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Catalog file (YAML)
    #[arg(short, long, env = "NETVERIFY_CATALOG")]
    pub catalog: PathBuf,

    /// Output format (junit prints as text)
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "NETVERIFY_FORMAT")]
    pub format: OutputFormat,
}
