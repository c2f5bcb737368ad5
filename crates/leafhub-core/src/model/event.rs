// ── Change events ──
//
// Delivery format of the external watch layer: one event per create,
// update or delete of an observed object.

use serde::{Deserialize, Serialize};

use super::object::Object;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "object", rename_all = "lowercase")]
pub enum ChangeEvent {
    /// Object created or updated.
    Applied(Object),
    Deleted(Object),
}

impl ChangeEvent {
    pub fn object(&self) -> &Object {
        match self {
            Self::Applied(o) | Self::Deleted(o) => o,
        }
    }
}
