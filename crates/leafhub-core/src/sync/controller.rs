// ── Status sync controller ──
//
// One controller per watched kind. Change events are applied to every
// bundle of the controller; a periodic task ships each bundle whose
// generation moved past the last one sent.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::entry::BundleCollectionEntry;
use crate::model::{ChangeEvent, ResourceKind};
use crate::transport::{STATUS_BUNDLE_MSG_TYPE, Transport, TransportMessage};

pub struct StatusSyncController {
    name: String,
    kind: ResourceKind,
    entries: Vec<BundleCollectionEntry>,
    transport: Arc<dyn Transport>,
    interval: Duration,
}

impl StatusSyncController {
    /// Entries are fed in order, so a base bundle must precede the
    /// bundles that record its generation.
    pub fn new(
        name: impl Into<String>,
        kind: ResourceKind,
        entries: Vec<BundleCollectionEntry>,
        transport: Arc<dyn Transport>,
        interval: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            entries,
            transport,
            interval,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn entries(&self) -> &[BundleCollectionEntry] {
        &self.entries
    }

    /// Apply a change event. Returns `false` for events of other kinds.
    pub fn handle(&self, event: &ChangeEvent) -> bool {
        let object = event.object();
        if object.kind() != self.kind {
            return false;
        }

        match event {
            ChangeEvent::Applied(o) if !o.is_being_deleted() => {
                debug!(controller = %self.name, name = o.name(), uid = o.uid(), "object applied");
                let object = o.sanitized();
                for entry in &self.entries {
                    entry.bundle().update_object(&object);
                }
            }
            ChangeEvent::Applied(o) | ChangeEvent::Deleted(o) => {
                debug!(controller = %self.name, name = o.name(), uid = o.uid(), "object deleted");
                for entry in &self.entries {
                    entry.bundle().delete_object(o);
                }
            }
        }
        true
    }

    /// Send every enabled bundle with unsent changes. Returns the number
    /// of bundles handed to the transport.
    pub fn sync_once(&self) -> usize {
        let mut sent = 0;
        for entry in &self.entries {
            let generation = entry.bundle().generation();
            if generation <= entry.last_sent_generation() || !entry.is_enabled() {
                continue;
            }

            let payload = match entry.bundle().payload() {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(key = entry.transport_key(), error = %e, "failed to encode bundle, retrying next cycle");
                    continue;
                }
            };

            self.transport.send_async(TransportMessage {
                id: entry.transport_key().to_owned(),
                msg_type: STATUS_BUNDLE_MSG_TYPE.to_owned(),
                version: generation.to_string(),
                payload,
            });
            entry.mark_sent(generation);
            info!(key = entry.transport_key(), generation, "bundle sent");
            sent += 1;
        }
        sent
    }

    /// Periodic sync until `cancel` fires, then one last sync so nothing
    /// accumulated since the previous tick is lost.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        info!(controller = %self.name, interval = ?self.interval, "status sync started");
        let mut interval = tokio::time::interval(self.interval);
        interval.tick().await; // consume the immediate first tick

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    self.sync_once();
                }
            }
        }

        self.sync_once();
        info!(controller = %self.name, "status sync stopped");
    }
}
