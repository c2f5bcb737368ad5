// ── Policy domain type ──
//
// Governance policies propagated from the hub of hubs. Only the fields
// the compliance bundles derive their entries from are modelled; the
// policy templates themselves are opaque to the agent.

use serde::{Deserialize, Serialize};

use super::meta::{ObjectMeta, ResourceVersion};

/// Annotation carrying the policy's identity on the hub of hubs. The
/// locally observed policy is a copy, so its own UID is meaningless
/// upstream.
pub const ORIGIN_OWNER_REFERENCE_ANNOTATION: &str =
    "hub-of-hubs.open-cluster-management.io/originOwnerReferenceUid";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PolicySpec,
    #[serde(default)]
    pub status: PolicyStatus,
}

impl Policy {
    /// The hub-of-hubs policy ID, if this policy was sent from there.
    pub fn origin_policy_id(&self) -> Option<&str> {
        self.metadata.annotation(ORIGIN_OWNER_REFERENCE_ANNOTATION)
    }

    pub fn resource_version(&self) -> &ResourceVersion {
        &self.metadata.resource_version
    }

    pub fn remediation_action(&self) -> &str {
        &self.spec.remediation_action
    }

    /// Per-cluster compliance records.
    pub fn cluster_statuses(&self) -> &[ClusterComplianceStatus] {
        &self.status.status
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySpec {
    /// `inform` or `enforce` in practice, carried verbatim.
    #[serde(default)]
    pub remediation_action: String,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatus {
    /// Aggregated state across all clusters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliant: Option<ComplianceState>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<ClusterComplianceStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterComplianceStatus {
    #[serde(rename = "clustername")]
    pub cluster_name: String,
    #[serde(rename = "clusternamespace", default)]
    pub cluster_namespace: String,
    #[serde(rename = "compliant", default, skip_serializing_if = "Option::is_none")]
    pub compliance_state: Option<ComplianceState>,
}

impl ClusterComplianceStatus {
    pub fn is_compliant(&self) -> bool {
        self.compliance_state == Some(ComplianceState::Compliant)
    }

    pub fn is_non_compliant(&self) -> bool {
        self.compliance_state == Some(ComplianceState::NonCompliant)
    }
}

/// Compliance reported for one cluster. A missing state, `Pending` and
/// anything unrecognised all count as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum ComplianceState {
    Compliant,
    NonCompliant,
    Pending,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_cluster_records() {
        let policy: Policy = serde_json::from_value(json!({
            "metadata": {
                "name": "policy-1",
                "namespace": "default",
                "uid": "local-uid",
                "resourceVersion": "42",
                "annotations": { ORIGIN_OWNER_REFERENCE_ANNOTATION: "origin-1" }
            },
            "spec": { "remediationAction": "inform" },
            "status": {
                "compliant": "NonCompliant",
                "status": [
                    { "clustername": "c1", "clusternamespace": "c1", "compliant": "Compliant" },
                    { "clustername": "c2", "clusternamespace": "c2", "compliant": "NonCompliant" },
                    { "clustername": "c3", "clusternamespace": "c3", "compliant": "Drifting" },
                    { "clustername": "c4", "clusternamespace": "c4" }
                ]
            }
        }))
        .unwrap();

        assert_eq!(policy.origin_policy_id(), Some("origin-1"));
        assert_eq!(policy.remediation_action(), "inform");

        let states: Vec<_> = policy
            .cluster_statuses()
            .iter()
            .map(|c| c.compliance_state)
            .collect();
        assert_eq!(
            states,
            vec![
                Some(ComplianceState::Compliant),
                Some(ComplianceState::NonCompliant),
                Some(ComplianceState::Unknown),
                None,
            ]
        );
    }

    #[test]
    fn pending_is_neither_compliant_nor_non_compliant() {
        let record = ClusterComplianceStatus {
            cluster_name: "c1".into(),
            cluster_namespace: "c1".into(),
            compliance_state: Some(ComplianceState::Pending),
        };
        assert!(!record.is_compliant());
        assert!(!record.is_non_compliant());
    }
}
