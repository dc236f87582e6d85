//! Error types shared by the document stores, the session provider and the
//! note store.

use thiserror::Error;

/// Failure reported by a [`crate::DocumentStore`] write.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid document data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure or cancellation of a sign-in / sign-out action.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    #[error("sign-in cancelled")]
    Cancelled,

    #[error("authentication failed: {0}")]
    Failed(String),
}

/// Failure of a [`crate::NoteStore`] mutation.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("no user is signed in")]
    SignedOut,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure to read `notes.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
