// ── Domain model ──
//
// Objects observed on the leaf hub, as delivered by the watch layer.

pub mod event;
pub mod meta;
pub mod object;
pub mod policy;

pub use event::ChangeEvent;
pub use meta::{ObjectMeta, ResourceVersion};
pub use object::{GenericResource, Object, ResourceKind};
pub use policy::{
    ClusterComplianceStatus, ComplianceState, ORIGIN_OWNER_REFERENCE_ANNOTATION, Policy,
    PolicySpec, PolicyStatus,
};
