// ── Transport abstraction ──
//
// Outbound channel to the hub of hubs. Sending is a non-blocking
// hand-off: delivery failures are the transport's business and are
// logged there, never surfaced to the sync loops.

mod file;

pub use file::FileTransport;

use tracing::debug;

/// Message type of every status bundle.
pub const STATUS_BUNDLE_MSG_TYPE: &str = "StatusBundle";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportMessage {
    /// Transport key, `<leaf hub>.<component>`.
    pub id: String,
    pub msg_type: String,
    /// Bundle generation, as a decimal string.
    pub version: String,
    pub payload: Vec<u8>,
}

pub trait Transport: Send + Sync {
    /// Queue `message` for delivery.
    fn send_async(&self, message: TransportMessage);

    /// Last version acknowledged for `id`, if any.
    fn get_version(&self, id: &str, msg_type: &str) -> Option<String>;
}

/// Generation to seed a bundle with, so numbering resumes across
/// restarts. Falls back to 0 when nothing usable was acknowledged.
pub fn generation_from_transport(transport: &dyn Transport, id: &str, msg_type: &str) -> u64 {
    let Some(version) = transport.get_version(id, msg_type) else {
        debug!(id, msg_type, "no acknowledged version, starting from generation 0");
        return 0;
    };

    version.parse().unwrap_or_else(|e| {
        debug!(id, msg_type, %version, error = %e, "unparsable version, starting from generation 0");
        0
    })
}
