//! Clap derive structures for the `leafhub` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use leafhub_core::AggregationLevel;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// leafhub -- status sync agent for a hub-of-hubs leaf hub
#[derive(Debug, Parser)]
#[command(
    name = "leafhub",
    version,
    about = "Forward compacted cluster-management status from a leaf hub to the hub of hubs",
    long_about = "Folds change events for managed clusters, cluster deployments, machine pools,\n\
        klusterlet addon configs and policies into generation-stamped status bundles,\n\
        and ships each bundle to the hub of hubs whenever it changes.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "LEAFHUB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AggregationLevelArg {
    /// Per-cluster compliance lists
    Full,
    /// Per-policy compliance counts
    Minimal,
}

impl From<AggregationLevelArg> for AggregationLevel {
    fn from(arg: AggregationLevelArg) -> Self {
        match arg {
            AggregationLevelArg::Full => Self::Full,
            AggregationLevelArg::Minimal => Self::Minimal,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aggregate change events into status bundles and ship them
    Run(RunArgs),

    /// Strip cleanup finalizers and origin annotations from policies
    Cleanup(CleanupArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Run ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RunArgs {
    /// JSON-lines change event source ("-" for stdin)
    #[arg(long, short = 'e')]
    pub events: Option<PathBuf>,

    /// Directory bundles are written to
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Name this leaf hub reports under
    #[arg(long)]
    pub leaf_hub_name: Option<String>,

    /// Policy compliance detail sent upstream
    #[arg(long, value_enum)]
    pub aggregation_level: Option<AggregationLevelArg>,

    /// Seconds between bundle syncs
    #[arg(long)]
    pub sync_interval: Option<u64>,
}

// ── Cleanup ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CleanupArgs {
    /// JSON array of objects ("-" for stdin)
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Where to write the cleaned objects (stdout when omitted)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Finalizer to remove
    #[arg(long, conflicts_with = "component")]
    pub finalizer: Option<String>,

    /// Derive the finalizer from a component name
    #[arg(long, default_value = "policy")]
    pub component: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
