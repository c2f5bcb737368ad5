//! Status aggregation for a leaf hub of the hub-of-hubs control plane.
//!
//! Change events for the watched resource kinds are folded into
//! generation-stamped bundles, which are shipped to the hub of hubs
//! whenever their generation moves:
//!
//! - **[`bundle`]**: the [`Bundle`] contract and its three implementations.
//!   [`GenericStatusBundle`] mirrors objects verbatim,
//!   [`ComplianceStatusBundle`] keeps only the non-compliant and unknown
//!   clusters of each policy, and [`MinimalComplianceStatusBundle`]
//!   collapses each policy into counts.
//!
//! - **[`sync`]**: [`StatusSyncController`] routes change events into its
//!   bundles and periodically sends the ones that changed.
//!   [`sync::components::build_controllers`] assembles the full set for a
//!   leaf hub.
//!
//! - **[`transport`]**: the outbound [`Transport`] seam and a
//!   [`FileTransport`] that persists each bundle as a JSON file.
//!
//! - **[`cleanup`]**: strips cleanup finalizers and origin annotations
//!   from replicated policies.

pub mod bundle;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod model;
pub mod sync;
pub mod transport;

// ── Primary re-exports ──────────────────────────────────────────────
pub use bundle::{
    Bundle, ComplianceStatusBundle, GenericStatusBundle, MinimalComplianceStatusBundle,
    MinimalPolicyComplianceStatus, PolicyComplianceStatus,
};
pub use config::{AggregationLevel, SharedAggregationLevel, SyncConfig};
pub use error::CoreError;
pub use model::{
    ChangeEvent, ClusterComplianceStatus, ComplianceState, GenericResource, Object, ObjectMeta,
    Policy, ResourceKind, ResourceVersion,
};
pub use sync::{BundleCollectionEntry, StatusSyncController};
pub use transport::{
    FileTransport, STATUS_BUNDLE_MSG_TYPE, Transport, TransportMessage, generation_from_transport,
};
