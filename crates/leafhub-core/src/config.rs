// ── Runtime sync configuration ──
//
// Describes *what* the agent reports and how often. Built by the binary
// from the config file and CLI flags; core never reads config files.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};


/// How much detail the hub of hubs receives about policy compliance.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AggregationLevel {
    /// Per-cluster compliance lists plus the clusters-per-policy base bundle.
    #[default]
    Full,
    /// Per-policy compliance counts only.
    Minimal,
}

/// Aggregation level shared between the bundle predicates and whoever
/// reconfigures the agent. Reads never block.
#[derive(Debug, Clone)]
pub struct SharedAggregationLevel(Arc<ArcSwap<AggregationLevel>>);

impl SharedAggregationLevel {
    pub fn new(level: AggregationLevel) -> Self {
        Self(Arc::new(ArcSwap::from_pointee(level)))
    }

    pub fn get(&self) -> AggregationLevel {
        **self.0.load()
    }

    pub fn set(&self, level: AggregationLevel) {
        self.0.store(Arc::new(level));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Name of this leaf hub, stamped on every bundle.
    pub leaf_hub_name: String,
    /// Period of the bundle sync loops.
    pub sync_interval: Duration,
    pub aggregation_level: AggregationLevel,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            leaf_hub_name: String::new(),
            sync_interval: Duration::from_secs(5),
            aggregation_level: AggregationLevel::default(),
        }
    }
}
