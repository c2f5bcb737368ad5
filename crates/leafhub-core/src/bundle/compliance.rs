// ── Compliance status bundle ──
//
// Per-policy lists of the clusters that are non-compliant or whose
// compliance is unknown. Fully compliant policies are left out entirely,
// so the hub of hubs only receives what needs attention. Entries are
// keyed by the hub-of-hubs policy ID rather than the local UID.
//
// The bundle is paired with a base bundle (clusters per policy) and
// records that bundle's generation, letting the receiver apply the two
// together.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Bundle, origin_policy};
use crate::error::CoreError;
use crate::model::{Object, Policy, ResourceVersion};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyComplianceStatus {
    pub policy_id: String,
    pub non_compliant_clusters: Vec<String>,
    pub unknown_compliance_clusters: Vec<String>,
    /// Change detection only; never transmitted.
    #[serde(skip)]
    pub resource_version: ResourceVersion,
}

pub struct ComplianceStatusBundle {
    leaf_hub_name: String,
    base_bundle: Arc<dyn Bundle>,
    state: Mutex<ComplianceBundleState>,
}

struct ComplianceBundleState {
    objects: Vec<PolicyComplianceStatus>,
    base_bundle_generation: u64,
    generation: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompliancePayload<'a> {
    objects: &'a [PolicyComplianceStatus],
    leaf_hub_name: &'a str,
    base_bundle_generation: u64,
    generation: u64,
}

/// Cluster names bucketed by compliance, in status order.
struct ComplianceBuckets {
    non_compliant: Vec<String>,
    unknown: Vec<String>,
}

impl ComplianceBuckets {
    fn classify(policy: &Policy) -> Self {
        let mut buckets = Self {
            non_compliant: Vec::new(),
            unknown: Vec::new(),
        };
        for record in policy.cluster_statuses() {
            if record.is_compliant() {
                continue;
            }
            if record.is_non_compliant() {
                buckets.non_compliant.push(record.cluster_name.clone());
            } else {
                buckets.unknown.push(record.cluster_name.clone());
            }
        }
        buckets
    }

    fn is_empty(&self) -> bool {
        self.non_compliant.is_empty() && self.unknown.is_empty()
    }

    /// Lists of equal length where every new member is an old member
    /// hold the same clusters.
    fn differs_from(&self, entry: &PolicyComplianceStatus) -> bool {
        if self.non_compliant.len() != entry.non_compliant_clusters.len()
            || self.unknown.len() != entry.unknown_compliance_clusters.len()
        {
            return true;
        }
        self.non_compliant
            .iter()
            .any(|c| !entry.non_compliant_clusters.contains(c))
            || self
                .unknown
                .iter()
                .any(|c| !entry.unknown_compliance_clusters.contains(c))
    }
}

impl ComplianceStatusBundle {
    pub fn new(
        leaf_hub_name: impl Into<String>,
        base_bundle: Arc<dyn Bundle>,
        generation: u64,
    ) -> Self {
        let base_bundle_generation = base_bundle.generation();
        Self {
            leaf_hub_name: leaf_hub_name.into(),
            base_bundle,
            state: Mutex::new(ComplianceBundleState {
                objects: Vec::new(),
                base_bundle_generation,
                generation,
            }),
        }
    }

    pub fn leaf_hub_name(&self) -> &str {
        &self.leaf_hub_name
    }

    /// Base bundle generation as of the last update or delete.
    pub fn base_bundle_generation(&self) -> u64 {
        self.state.lock().base_bundle_generation
    }

    pub fn objects(&self) -> Vec<PolicyComplianceStatus> {
        self.state.lock().objects.clone()
    }
}

impl Bundle for ComplianceStatusBundle {
    fn update_object(&self, object: &Object) {
        let base_bundle_generation = self.base_bundle.generation();
        let mut state = self.state.lock();
        state.base_bundle_generation = base_bundle_generation;

        let Some((policy, policy_id)) = origin_policy(object) else {
            return;
        };

        let Some(index) = state.objects.iter().position(|s| s.policy_id == policy_id) else {
            let buckets = ComplianceBuckets::classify(policy);
            if buckets.is_empty() {
                debug!(policy_id, "policy compliant on all clusters, not tracked");
                return;
            }
            state.objects.push(PolicyComplianceStatus {
                policy_id: policy_id.to_owned(),
                non_compliant_clusters: buckets.non_compliant,
                unknown_compliance_clusters: buckets.unknown,
                resource_version: policy.resource_version().clone(),
            });
            state.generation = state.generation.saturating_add(1);
            return;
        };

        if state.objects[index].resource_version == *policy.resource_version() {
            return;
        }

        let buckets = ComplianceBuckets::classify(policy);
        if !buckets.differs_from(&state.objects[index]) {
            return;
        }

        if buckets.is_empty() {
            debug!(policy_id, "policy became compliant on all clusters");
            state.objects.remove(index);
        } else {
            let entry = &mut state.objects[index];
            entry.non_compliant_clusters = buckets.non_compliant;
            entry.unknown_compliance_clusters = buckets.unknown;
            entry.resource_version = policy.resource_version().clone();
        }
        state.generation = state.generation.saturating_add(1);
    }

    /// Removes the entry without bumping the generation: a deleted policy
    /// also leaves the base bundle, whose transmission carries the change.
    fn delete_object(&self, object: &Object) {
        let base_bundle_generation = self.base_bundle.generation();
        let mut state = self.state.lock();
        state.base_bundle_generation = base_bundle_generation;

        let Some((_, policy_id)) = origin_policy(object) else {
            return;
        };
        state.objects.retain(|s| s.policy_id != policy_id);
    }

    fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    fn payload(&self) -> Result<Vec<u8>, CoreError> {
        let state = self.state.lock();
        Ok(serde_json::to_vec(&CompliancePayload {
            objects: &state.objects,
            leaf_hub_name: &self.leaf_hub_name,
            base_bundle_generation: state.base_bundle_generation,
            generation: state.generation,
        })?)
    }
}
