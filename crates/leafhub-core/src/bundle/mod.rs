// ── Status bundles ──
//
// A bundle accumulates the derived status of one resource kind and
// stamps it with a generation. Watch handlers feed it change events;
// the sync loop reads the generation and ships the payload whenever the
// generation moved past what it last sent.
//
// Every operation takes the bundle's single lock for its whole
// duration. No operation holds one bundle's lock while acquiring
// another's: the compliance bundle reads its base bundle's generation
// before locking itself.

mod compliance;
mod generic;
mod minimal;

pub use compliance::{ComplianceStatusBundle, PolicyComplianceStatus};
pub use generic::GenericStatusBundle;
pub use minimal::{MinimalComplianceStatusBundle, MinimalPolicyComplianceStatus};

use crate::error::CoreError;
use crate::model::{Object, Policy};

/// Shared contract of all status bundles.
///
/// Updates and deletes never fail; objects a bundle does not handle are
/// ignored.
pub trait Bundle: Send + Sync {
    /// Insert or refresh the entry derived from `object`.
    fn update_object(&self, object: &Object);

    /// Drop the entry derived from `object`, if tracked.
    fn delete_object(&self, object: &Object);

    /// Current generation. Never decreases.
    fn generation(&self) -> u64;

    /// JSON encoding of the bundle as sent to the hub of hubs.
    ///
    /// Taken under the same lock as the other operations but separately
    /// from [`generation`](Self::generation), so the two may be one
    /// mutation apart. Receivers are idempotent per generation.
    fn payload(&self) -> Result<Vec<u8>, CoreError>;
}

/// The policy behind `object` and its hub-of-hubs ID, if `object` is a
/// policy that originated on the hub of hubs.
pub(crate) fn origin_policy(object: &Object) -> Option<(&Policy, &str)> {
    let policy = object.as_policy()?;
    let policy_id = policy.origin_policy_id()?;
    Some((policy, policy_id))
}
