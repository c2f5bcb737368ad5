// ── Observed objects ──
//
// `Object` is the unit every change event carries. Cluster-lifecycle
// kinds are mirrored as-is, so their spec and status stay free-form JSON;
// policies are typed because the compliance bundles read into them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::meta::{ObjectMeta, ResourceVersion};
use super::policy::Policy;

/// Resource kinds the agent reports on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum ResourceKind {
    ManagedCluster,
    ClusterDeployment,
    MachinePool,
    KlusterletAddonConfig,
    Policy,
}

/// A resource mirrored without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub spec: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub status: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Object {
    ManagedCluster(GenericResource),
    ClusterDeployment(GenericResource),
    MachinePool(GenericResource),
    KlusterletAddonConfig(GenericResource),
    Policy(Policy),
}

impl Object {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::ManagedCluster(_) => ResourceKind::ManagedCluster,
            Self::ClusterDeployment(_) => ResourceKind::ClusterDeployment,
            Self::MachinePool(_) => ResourceKind::MachinePool,
            Self::KlusterletAddonConfig(_) => ResourceKind::KlusterletAddonConfig,
            Self::Policy(_) => ResourceKind::Policy,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Self::ManagedCluster(r)
            | Self::ClusterDeployment(r)
            | Self::MachinePool(r)
            | Self::KlusterletAddonConfig(r) => &r.metadata,
            Self::Policy(p) => &p.metadata,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut ObjectMeta {
        match self {
            Self::ManagedCluster(r)
            | Self::ClusterDeployment(r)
            | Self::MachinePool(r)
            | Self::KlusterletAddonConfig(r) => &mut r.metadata,
            Self::Policy(p) => &mut p.metadata,
        }
    }

    pub fn uid(&self) -> &str {
        &self.metadata().uid
    }

    pub fn name(&self) -> &str {
        &self.metadata().name
    }

    pub fn resource_version(&self) -> &ResourceVersion {
        &self.metadata().resource_version
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata().annotation(key)
    }

    pub fn as_policy(&self) -> Option<&Policy> {
        match self {
            Self::Policy(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_being_deleted(&self) -> bool {
        self.metadata().deletion_timestamp.is_some()
    }

    /// Copy without the fields that only matter on this cluster.
    pub fn sanitized(&self) -> Self {
        let mut object = self.clone();
        object.metadata_mut().finalizers.clear();
        object
    }
}

impl From<Policy> for Object {
    fn from(policy: Policy) -> Self {
        Self::Policy(policy)
    }
}
