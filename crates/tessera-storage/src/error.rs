use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Storage credential is missing or still the placeholder value")]
    MissingCredential,

    #[error("Invalid content hash: {0}")]
    InvalidHash(String),

    #[error("No content stored under {0}")]
    NotFound(String),

    #[error("Content mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },
}
