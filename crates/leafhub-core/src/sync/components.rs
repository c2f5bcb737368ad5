// ── Component registry ──
//
// The controllers a leaf hub runs: one per watched kind, each with the
// bundles it feeds. Every bundle is seeded from the generation the
// transport last acknowledged for its key.

use std::sync::Arc;

use tracing::info;

use super::controller::StatusSyncController;
use super::entry::BundleCollectionEntry;
use crate::bundle::{
    Bundle, ComplianceStatusBundle, GenericStatusBundle, MinimalComplianceStatusBundle,
};
use crate::config::{AggregationLevel, SharedAggregationLevel, SyncConfig};
use crate::model::ResourceKind;
use crate::transport::{STATUS_BUNDLE_MSG_TYPE, Transport, generation_from_transport};

pub const MANAGED_CLUSTERS_MSG_KEY: &str = "ManagedClusters";
pub const CLUSTER_DEPLOYMENTS_MSG_KEY: &str = "clusterdeployments";
pub const MACHINE_POOLS_MSG_KEY: &str = "machinepools";
pub const KLUSTERLET_ADDON_CONFIGS_MSG_KEY: &str = "klusterletaddonconfigs";
pub const CLUSTERS_PER_POLICY_MSG_KEY: &str = "ClustersPerPolicy";
pub const POLICY_COMPLIANCE_MSG_KEY: &str = "PolicyCompliance";
pub const MINIMAL_POLICY_COMPLIANCE_MSG_KEY: &str = "MinimalPolicyCompliance";

/// `<leaf hub>.<component>`.
pub fn transport_key(leaf_hub_name: &str, component: &str) -> String {
    format!("{leaf_hub_name}.{component}")
}

/// Build every controller the agent runs.
pub fn build_controllers(
    config: &SyncConfig,
    transport: &Arc<dyn Transport>,
    level: &SharedAggregationLevel,
) -> Vec<Arc<StatusSyncController>> {
    let mirrored = [
        (ResourceKind::ManagedCluster, MANAGED_CLUSTERS_MSG_KEY, "clusters-status-sync"),
        (ResourceKind::ClusterDeployment, CLUSTER_DEPLOYMENTS_MSG_KEY, "clusterdeployments-status-sync"),
        (ResourceKind::MachinePool, MACHINE_POOLS_MSG_KEY, "machinepools-status-sync"),
        (
            ResourceKind::KlusterletAddonConfig,
            KLUSTERLET_ADDON_CONFIGS_MSG_KEY,
            "klusterletaddonconfigs-status-sync",
        ),
    ];

    let mut controllers: Vec<_> = mirrored
        .into_iter()
        .map(|(kind, component, name)| {
            Arc::new(mirror_controller(config, transport, kind, component, name))
        })
        .collect();
    controllers.push(Arc::new(policies_controller(config, transport, level)));

    info!(
        leaf_hub = %config.leaf_hub_name,
        controllers = controllers.len(),
        aggregation_level = %level.get(),
        "status sync controllers built"
    );
    controllers
}

/// A single generic bundle, sent under every aggregation level.
fn mirror_controller(
    config: &SyncConfig,
    transport: &Arc<dyn Transport>,
    kind: ResourceKind,
    component: &str,
    name: &str,
) -> StatusSyncController {
    let key = transport_key(&config.leaf_hub_name, component);
    let generation = generation_from_transport(transport.as_ref(), &key, STATUS_BUNDLE_MSG_TYPE);
    let bundle: Arc<dyn Bundle> = Arc::new(GenericStatusBundle::new(&config.leaf_hub_name, generation));

    StatusSyncController::new(
        name,
        kind,
        vec![BundleCollectionEntry::new(key, bundle, || true)],
        Arc::clone(transport),
        config.sync_interval,
    )
}

/// Clusters-per-policy base bundle and the full compliance bundle under
/// `full`; the minimal compliance bundle under `minimal`. All three are
/// always fed so switching levels sends current state.
fn policies_controller(
    config: &SyncConfig,
    transport: &Arc<dyn Transport>,
    level: &SharedAggregationLevel,
) -> StatusSyncController {
    let leaf_hub = config.leaf_hub_name.as_str();
    let seed = |component: &str| {
        let key = transport_key(leaf_hub, component);
        let generation = generation_from_transport(transport.as_ref(), &key, STATUS_BUNDLE_MSG_TYPE);
        (key, generation)
    };

    let (base_key, base_generation) = seed(CLUSTERS_PER_POLICY_MSG_KEY);
    let base: Arc<dyn Bundle> = Arc::new(GenericStatusBundle::new(leaf_hub, base_generation));

    let (compliance_key, compliance_generation) = seed(POLICY_COMPLIANCE_MSG_KEY);
    let compliance: Arc<dyn Bundle> = Arc::new(ComplianceStatusBundle::new(
        leaf_hub,
        Arc::clone(&base),
        compliance_generation,
    ));

    let (minimal_key, minimal_generation) = seed(MINIMAL_POLICY_COMPLIANCE_MSG_KEY);
    let minimal: Arc<dyn Bundle> =
        Arc::new(MinimalComplianceStatusBundle::new(leaf_hub, minimal_generation));

    let entries = vec![
        BundleCollectionEntry::new(base_key, base, level_is(level, AggregationLevel::Full)),
        BundleCollectionEntry::new(
            compliance_key,
            compliance,
            level_is(level, AggregationLevel::Full),
        ),
        BundleCollectionEntry::new(
            minimal_key,
            minimal,
            level_is(level, AggregationLevel::Minimal),
        ),
    ];

    StatusSyncController::new(
        "policies-status-sync",
        ResourceKind::Policy,
        entries,
        Arc::clone(transport),
        config.sync_interval,
    )
}

fn level_is(
    level: &SharedAggregationLevel,
    wanted: AggregationLevel,
) -> impl Fn() -> bool + Send + Sync + 'static {
    let level = level.clone();
    move || level.get() == wanted
}
