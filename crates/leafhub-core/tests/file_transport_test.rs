#![allow(clippy::unwrap_used)]
// Integration tests for `FileTransport` against a temporary directory.

use std::path::Path;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use leafhub_core::{
    FileTransport, STATUS_BUNDLE_MSG_TYPE, Transport, TransportMessage, generation_from_transport,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn message(id: &str, version: u64, payload: &Value) -> TransportMessage {
    TransportMessage {
        id: id.into(),
        msg_type: STATUS_BUNDLE_MSG_TYPE.into(),
        version: version.to_string(),
        payload: serde_json::to_vec(payload).unwrap(),
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn writes_envelope_with_embedded_payload() {
    let dir = tempfile::tempdir().unwrap();
    let transport = FileTransport::open(dir.path()).await.unwrap();

    let payload = json!({ "objects": [], "leafHubName": "hub1" });
    transport.send_async(message("hub1.ManagedClusters", 3, &payload));
    transport.flush().await.unwrap();

    assert_eq!(
        read_json(&dir.path().join("hub1.ManagedClusters.json")),
        json!({
            "id": "hub1.ManagedClusters",
            "msgType": "StatusBundle",
            "version": "3",
            "payload": payload,
        })
    );
    assert_eq!(
        transport.get_version("hub1.ManagedClusters", STATUS_BUNDLE_MSG_TYPE),
        Some("3".to_string())
    );
    assert!(!dir.path().join("hub1.ManagedClusters.json.tmp").exists());
    transport.close().await;
}

#[tokio::test]
async fn later_generation_replaces_file() {
    let dir = tempfile::tempdir().unwrap();
    let transport = FileTransport::open(dir.path()).await.unwrap();

    transport.send_async(message("hub1.machinepools", 1, &json!({ "objects": [1] })));
    transport.send_async(message("hub1.machinepools", 2, &json!({ "objects": [2] })));
    transport.flush().await.unwrap();

    let stored = read_json(&dir.path().join("hub1.machinepools.json"));
    assert_eq!(stored["version"], "2");
    assert_eq!(stored["payload"], json!({ "objects": [2] }));
    transport.close().await;
}

#[tokio::test]
async fn reopening_resumes_versions() {
    let dir = tempfile::tempdir().unwrap();
    {
        let transport = FileTransport::open(dir.path()).await.unwrap();
        transport.send_async(message("hub1.PolicyCompliance", 41, &json!({})));
        transport.close().await;
    }
    std::fs::write(dir.path().join("notes.txt"), "not a bundle").unwrap();
    std::fs::write(dir.path().join("broken.json"), "{").unwrap();

    let transport = FileTransport::open(dir.path()).await.unwrap();
    assert_eq!(
        generation_from_transport(&transport, "hub1.PolicyCompliance", STATUS_BUNDLE_MSG_TYPE),
        41
    );
    assert_eq!(
        generation_from_transport(&transport, "hub1.ManagedClusters", STATUS_BUNDLE_MSG_TYPE),
        0
    );
    transport.close().await;
}

#[tokio::test]
async fn sends_after_close_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let transport = FileTransport::open(dir.path()).await.unwrap();
    transport.close().await;

    transport.send_async(message("hub1.ManagedClusters", 1, &json!({})));
    assert!(transport.flush().await.is_err());
    assert!(!dir.path().join("hub1.ManagedClusters.json").exists());
}

#[tokio::test]
async fn creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let transport = FileTransport::open(&nested).await.unwrap();
    assert!(nested.is_dir());
    assert_eq!(transport.dir(), nested.as_path());
    transport.close().await;
}
