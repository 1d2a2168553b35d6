use std::path::PathBuf;

/// Errors from snapshot save/load operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// I/O failure while reading or writing the snapshot file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot file exists but does not parse as the expected state.
    #[error("corrupt snapshot at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The state could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
