// ── Minimal compliance status bundle ──
//
// Low-detail alternative to the compliance bundle: per policy, only the
// number of clusters it applies to, how many of them are not compliant,
// and the remediation action. With no per-cluster detail to trim, every
// tracked policy is present, compliant or not.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::{Bundle, origin_policy};
use crate::error::CoreError;
use crate::model::{Object, Policy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalPolicyComplianceStatus {
    pub policy_id: String,
    pub remediation_action: String,
    pub applied_clusters: usize,
    pub non_compliant_clusters: usize,
}

impl MinimalPolicyComplianceStatus {
    fn derive(policy_id: &str, policy: &Policy) -> Self {
        let records = policy.cluster_statuses();
        Self {
            policy_id: policy_id.to_owned(),
            remediation_action: policy.remediation_action().to_owned(),
            applied_clusters: records.len(),
            // Unknown and pending count against the policy here.
            non_compliant_clusters: records.iter().filter(|r| !r.is_compliant()).count(),
        }
    }
}

pub struct MinimalComplianceStatusBundle {
    leaf_hub_name: String,
    state: Mutex<MinimalState>,
}

struct MinimalState {
    objects: Vec<MinimalPolicyComplianceStatus>,
    generation: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MinimalPayload<'a> {
    objects: &'a [MinimalPolicyComplianceStatus],
    leaf_hub_name: &'a str,
    generation: u64,
}

impl MinimalComplianceStatusBundle {
    pub fn new(leaf_hub_name: impl Into<String>, generation: u64) -> Self {
        Self {
            leaf_hub_name: leaf_hub_name.into(),
            state: Mutex::new(MinimalState {
                objects: Vec::new(),
                generation,
            }),
        }
    }

    pub fn leaf_hub_name(&self) -> &str {
        &self.leaf_hub_name
    }

    pub fn objects(&self) -> Vec<MinimalPolicyComplianceStatus> {
        self.state.lock().objects.clone()
    }
}

impl Bundle for MinimalComplianceStatusBundle {
    fn update_object(&self, object: &Object) {
        let Some((policy, policy_id)) = origin_policy(object) else {
            return;
        };
        let derived = MinimalPolicyComplianceStatus::derive(policy_id, policy);

        let mut state = self.state.lock();
        let Some(existing) = state.objects.iter_mut().find(|s| s.policy_id == policy_id) else {
            state.objects.push(derived);
            state.generation = state.generation.saturating_add(1);
            return;
        };

        let changed = existing.remediation_action != derived.remediation_action
            || existing.applied_clusters != derived.applied_clusters
            || existing.non_compliant_clusters != derived.non_compliant_clusters;
        if !changed {
            return;
        }

        *existing = derived;
        state.generation = state.generation.saturating_add(1);
    }

    fn delete_object(&self, object: &Object) {
        let Some((_, policy_id)) = origin_policy(object) else {
            return;
        };

        let mut state = self.state.lock();
        let Some(index) = state.objects.iter().position(|s| s.policy_id == policy_id) else {
            return;
        };
        state.objects.remove(index);
        state.generation = state.generation.saturating_add(1);
    }

    fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    fn payload(&self) -> Result<Vec<u8>, CoreError> {
        let state = self.state.lock();
        Ok(serde_json::to_vec(&MinimalPayload {
            objects: &state.objects,
            leaf_hub_name: &self.leaf_hub_name,
            generation: state.generation,
        })?)
    }
}
