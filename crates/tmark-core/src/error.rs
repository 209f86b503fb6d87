use std::path::PathBuf;

use thiserror::Error;

/// Persistence failures from the bookmark store.
///
/// Lookups that find nothing are not errors; they come back as `None`/`false`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} has schema version {found}; this build understands up to {supported}")]
    FutureVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },
}

impl StoreError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn serialize(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Serialize {
            path: path.into(),
            source,
        }
    }
}
