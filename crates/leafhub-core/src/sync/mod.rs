// ── Status sync ──
//
// Wiring between change events, bundles and the transport.

pub mod components;
mod controller;
mod entry;

pub use controller::StatusSyncController;
pub use entry::{BundleCollectionEntry, BundlePredicate};
