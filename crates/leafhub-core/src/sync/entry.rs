// ── Bundle collection entries ──

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::bundle::Bundle;

/// Decides whether a bundle is transmitted at all, e.g. only under a
/// given aggregation level.
pub type BundlePredicate = Box<dyn Fn() -> bool + Send + Sync>;

/// One bundle a controller feeds and transmits, with its transport key.
pub struct BundleCollectionEntry {
    transport_key: String,
    bundle: Arc<dyn Bundle>,
    predicate: BundlePredicate,
    last_sent_generation: AtomicU64,
}

impl BundleCollectionEntry {
    /// The bundle's current generation counts as already sent: it was
    /// seeded from what the transport acknowledged.
    pub fn new(
        transport_key: impl Into<String>,
        bundle: Arc<dyn Bundle>,
        predicate: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Self {
        let last_sent_generation = AtomicU64::new(bundle.generation());
        Self {
            transport_key: transport_key.into(),
            bundle,
            predicate: Box::new(predicate),
            last_sent_generation,
        }
    }

    pub fn transport_key(&self) -> &str {
        &self.transport_key
    }

    pub fn bundle(&self) -> &Arc<dyn Bundle> {
        &self.bundle
    }

    pub fn is_enabled(&self) -> bool {
        (self.predicate)()
    }

    pub fn last_sent_generation(&self) -> u64 {
        self.last_sent_generation.load(Ordering::Acquire)
    }

    pub(crate) fn mark_sent(&self, generation: u64) {
        self.last_sent_generation.store(generation, Ordering::Release);
    }
}

impl fmt::Debug for BundleCollectionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleCollectionEntry")
            .field("transport_key", &self.transport_key)
            .field("generation", &self.bundle.generation())
            .field("last_sent_generation", &self.last_sent_generation())
            .finish_non_exhaustive()
    }
}
