// ── Policy finalizer cleanup ──
//
// Policies replicated from the hub of hubs carry the origin-owner
// annotation and, once the agent has seen them, a cleanup finalizer.
// Detaching a leaf hub strips both so the objects can be deleted freely.

use tracing::info;

use crate::model::{ORIGIN_OWNER_REFERENCE_ANNOTATION, Object, Policy};

pub const CLEANUP_FINALIZER_PREFIX: &str = "hub-of-hubs.open-cluster-management.io/";

/// Finalizer name for a component, e.g. `policy` →
/// `hub-of-hubs.open-cluster-management.io/policy-cleanup`.
pub fn cleanup_finalizer(component: &str) -> String {
    format!("{CLEANUP_FINALIZER_PREFIX}{component}-cleanup")
}

/// Remove `finalizer` and the origin-owner annotation from `policy`.
///
/// Returns `false` without touching the policy when neither is present.
pub fn remove_finalizer_and_annotation(policy: &mut Policy, finalizer: &str) -> bool {
    let meta = &mut policy.metadata;
    if !meta.has_finalizer(finalizer)
        && !meta.annotations.contains_key(ORIGIN_OWNER_REFERENCE_ANNOTATION)
    {
        return false;
    }

    meta.remove_finalizer(finalizer);
    meta.annotations.remove(ORIGIN_OWNER_REFERENCE_ANNOTATION);
    info!(
        policy = %meta.name,
        namespace = meta.namespace.as_deref().unwrap_or_default(),
        finalizer,
        "removed cleanup finalizer and origin annotation"
    );
    true
}

/// Apply [`remove_finalizer_and_annotation`] to every policy in `objects`.
/// Other kinds are left untouched. Returns the number of policies changed.
pub fn clean_objects(objects: &mut [Object], finalizer: &str) -> usize {
    objects
        .iter_mut()
        .filter_map(|object| match object {
            Object::Policy(policy) => Some(policy),
            _ => None,
        })
        .map(|policy| remove_finalizer_and_annotation(policy, finalizer))
        .filter(|changed| *changed)
        .count()
}
