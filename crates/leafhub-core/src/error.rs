// ── Core error types ──
//
// Bundle operations themselves never fail: unrecognised input is a
// silent no-op. Errors only arise at the edges, when a bundle is encoded
// for transmission or a transport touches the filesystem.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Failed to encode bundle payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Transport is closed")]
    TransportClosed,
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
