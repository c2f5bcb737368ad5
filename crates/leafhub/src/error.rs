//! CLI error types with miette diagnostics.
//!
//! Maps core and config failures into user-facing errors with
//! actionable help text and stable exit codes.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use leafhub_config::ConfigError;
use leafhub_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const IO: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Usage ────────────────────────────────────────────────────────

    #[error("Invalid value for {arg}: {reason}")]
    #[diagnostic(code(leafhub::usage))]
    InvalidArgument { arg: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid configuration: {field} {reason}")]
    #[diagnostic(
        code(leafhub::invalid_config),
        help(
            "Set `{field}` in the config file, through LEAFHUB_* environment\n\
             variables, or with the matching `leafhub run` flag.\n\
             Run: leafhub config show"
        )
    )]
    InvalidConfig { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(
        code(leafhub::config),
        help("Check the config file syntax. Run: leafhub config path")
    )]
    Config(ConfigError),

    // ── Runtime ──────────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(leafhub::core))]
    Core(#[from] CoreError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error("Could not access {}", .path.display())]
    #[diagnostic(code(leafhub::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {input}")]
    #[diagnostic(
        code(leafhub::json),
        help("Expected a JSON array of Kubernetes objects, each with a `kind` field.")
    )]
    Json {
        input: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => exit_code::USAGE,
            Self::InvalidConfig { .. } | Self::Config(_) => exit_code::CONFIG,
            Self::Io { .. } | Self::Core(CoreError::Io { .. }) => exit_code::IO,
            Self::Core(_) | Self::Json { .. } => exit_code::GENERAL,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::InvalidConfig { field, reason },
            other => Self::Config(other),
        }
    }
}
