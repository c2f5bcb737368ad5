// ── Generic status bundle ──
//
// Mirrors observed objects as they are, keyed by UID. Used for every
// kind the hub of hubs wants verbatim (managed clusters, cluster
// deployments, ...).

use parking_lot::Mutex;
use serde::Serialize;
use tracing::trace;

use super::Bundle;
use crate::error::CoreError;
use crate::model::Object;

pub struct GenericStatusBundle {
    leaf_hub_name: String,
    state: Mutex<GenericState>,
}

struct GenericState {
    objects: Vec<Object>,
    generation: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenericPayload<'a> {
    objects: &'a [Object],
    leaf_hub_name: &'a str,
}

impl GenericStatusBundle {
    /// `generation` seeds the counter, normally with the last generation
    /// the transport acknowledged.
    pub fn new(leaf_hub_name: impl Into<String>, generation: u64) -> Self {
        Self {
            leaf_hub_name: leaf_hub_name.into(),
            state: Mutex::new(GenericState {
                objects: Vec::new(),
                generation,
            }),
        }
    }

    pub fn leaf_hub_name(&self) -> &str {
        &self.leaf_hub_name
    }

    /// Snapshot of the mirrored objects.
    pub fn objects(&self) -> Vec<Object> {
        self.state.lock().objects.clone()
    }
}

impl Bundle for GenericStatusBundle {
    fn update_object(&self, object: &Object) {
        let mut state = self.state.lock();

        if let Some(existing) = state.objects.iter_mut().find(|o| o.uid() == object.uid()) {
            if !object.resource_version().is_newer_than(existing.resource_version()) {
                trace!(
                    uid = object.uid(),
                    incoming = %object.resource_version(),
                    stored = %existing.resource_version(),
                    "ignoring stale object"
                );
                return;
            }
            *existing = object.clone();
        } else {
            state.objects.push(object.clone());
        }

        state.generation = state.generation.saturating_add(1);
    }

    fn delete_object(&self, object: &Object) {
        let mut state = self.state.lock();

        let Some(index) = state.objects.iter().position(|o| o.uid() == object.uid()) else {
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
        Ok(serde_json::to_vec(&GenericPayload {
            objects: &state.objects,
            leaf_hub_name: &self.leaf_hub_name,
        })?)
    }
}
