//! Configuration for the leaf hub agent.
//!
//! A single TOML file layered under `LEAFHUB_*` environment variables,
//! validated and translated to `leafhub_core::SyncConfig`. The binary
//! applies its command-line overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use leafhub_core::{AggregationLevel, SyncConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Name this leaf hub reports under.
    #[serde(default)]
    pub leaf_hub_name: String,

    #[serde(default)]
    pub aggregation_level: AggregationLevel,

    /// Period of the bundle sync loops, in seconds.
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,

    /// Directory the file transport writes bundles to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// JSON-lines change event source; stdin when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            leaf_hub_name: String::new(),
            aggregation_level: AggregationLevel::default(),
            sync_interval_secs: default_sync_interval_secs(),
            output_dir: default_output_dir(),
            events: None,
        }
    }
}

fn default_sync_interval_secs() -> u64 {
    5
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./bundles")
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leaf_hub_name.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "leaf_hub_name".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.sync_interval_secs == 0 {
            return Err(ConfigError::Validation {
                field: "sync_interval_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Validate and build the runtime sync settings.
    pub fn to_sync_config(&self) -> Result<SyncConfig, ConfigError> {
        self.validate()?;
        Ok(SyncConfig {
            leaf_hub_name: self.leaf_hub_name.trim().to_owned(),
            sync_interval: Duration::from_secs(self.sync_interval_secs),
            aggregation_level: self.aggregation_level,
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "open-cluster-management", "leafhub").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("leafhub");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from `path` (or the platform default) and the
/// environment. A missing default file is fine; a missing explicit one
/// is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(explicit) => {
            if !explicit.is_file() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", explicit.display()),
                )
                .into());
            }
            explicit.to_path_buf()
        }
        None => config_path(),
    };

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("LEAFHUB_"));

    let config: Config = figment.extract()?;
    Ok(config)
}
