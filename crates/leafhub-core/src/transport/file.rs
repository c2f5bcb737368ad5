// ── File-backed transport ──
//
// Writes each bundle to `<dir>/<id>.json`, replacing the previous
// generation. Files are written by a single background task fed through
// an unbounded channel, so `send_async` never blocks a sync loop. The
// version index is rebuilt from the directory on open, which is what
// lets bundle generations resume after a restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{Transport, TransportMessage};
use crate::error::CoreError;

type VersionIndex = DashMap<(String, String), String>;

/// On-disk envelope. The payload is embedded as JSON, not as bytes.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMessage {
    id: String,
    msg_type: String,
    version: String,
    payload: serde_json::Value,
}

enum WriterCommand {
    Write(TransportMessage),
    Flush(oneshot::Sender<()>),
    Shutdown,
}

pub struct FileTransport {
    dir: PathBuf,
    versions: Arc<VersionIndex>,
    tx: mpsc::UnboundedSender<WriterCommand>,
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl FileTransport {
    /// Open (creating if needed) `dir` and start the writer task.
    /// Must be called within a tokio runtime.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CoreError::io(dir.clone(), e))?;

        let versions = Arc::new(VersionIndex::new());
        load_versions(&dir, &versions).await?;

        let (tx, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(writer_task(dir.clone(), Arc::clone(&versions), rx));
        info!(dir = %dir.display(), known_bundles = versions.len(), "file transport ready");

        Ok(Self {
            dir,
            versions,
            tx,
            writer: Mutex::new(Some(writer)),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Wait until every message queued so far is on disk.
    pub async fn flush(&self) -> Result<(), CoreError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(WriterCommand::Flush(done_tx))
            .map_err(|_| CoreError::TransportClosed)?;
        done_rx.await.map_err(|_| CoreError::TransportClosed)
    }

    /// Stop the writer after draining the queue. Later sends are dropped.
    pub async fn close(&self) {
        let _ = self.tx.send(WriterCommand::Shutdown);
        let handle = self.writer.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "file transport writer task failed");
            }
        }
    }
}

impl Transport for FileTransport {
    fn send_async(&self, message: TransportMessage) {
        let id = message.id.clone();
        if self.tx.send(WriterCommand::Write(message)).is_err() {
            warn!(id = %id, "file transport closed, dropping bundle");
        }
    }

    fn get_version(&self, id: &str, msg_type: &str) -> Option<String> {
        self.versions
            .get(&(id.to_owned(), msg_type.to_owned()))
            .map(|v| v.value().clone())
    }
}

// ── Writer ───────────────────────────────────────────────────────

async fn writer_task(
    dir: PathBuf,
    versions: Arc<VersionIndex>,
    mut rx: mpsc::UnboundedReceiver<WriterCommand>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            WriterCommand::Write(message) => match write_message(&dir, &message).await {
                Ok(()) => {
                    debug!(id = %message.id, version = %message.version, "bundle written");
                    versions.insert((message.id, message.msg_type), message.version);
                }
                Err(e) => warn!(id = %message.id, error = %e, "failed to write bundle"),
            },
            WriterCommand::Flush(done) => {
                let _ = done.send(());
            }
            WriterCommand::Shutdown => break,
        }
    }
    debug!("file transport writer stopped");
}

async fn write_message(dir: &Path, message: &TransportMessage) -> Result<(), CoreError> {
    let stored = StoredMessage {
        id: message.id.clone(),
        msg_type: message.msg_type.clone(),
        version: message.version.clone(),
        payload: serde_json::from_slice(&message.payload)?,
    };
    let bytes = serde_json::to_vec_pretty(&stored)?;

    // Write-then-rename so readers never observe a half-written bundle.
    let path = dir.join(file_name(&message.id));
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|e| CoreError::io(tmp.clone(), e))?;
    tokio::fs::rename(&tmp, &path)
        .await
        .map_err(|e| CoreError::io(path.clone(), e))?;
    Ok(())
}

fn file_name(id: &str) -> String {
    let safe: String = id
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}.json")
}

// ── Version index ────────────────────────────────────────────────

async fn load_versions(dir: &Path, versions: &VersionIndex) -> Result<(), CoreError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| CoreError::io(dir, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CoreError::io(dir, e))?
    {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        match read_stored(&path).await {
            Ok(stored) => {
                versions.insert((stored.id, stored.msg_type), stored.version);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable bundle file"),
        }
    }
    Ok(())
}

async fn read_stored(path: &Path) -> Result<StoredMessage, CoreError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CoreError::io(path, e))?;
    Ok(serde_json::from_slice(&bytes)?)
}
