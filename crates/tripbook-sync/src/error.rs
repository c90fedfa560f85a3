//! Error types for feed and client operations.
//!
//! The merge engine itself is infallible; these errors only come from the
//! live-update side.

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Feed '{feed}' failed to connect: {reason}")]
    ConnectFailed { feed: String, reason: String },

    #[error("Feed '{0}' has been closed")]
    FeedClosed(String),

    #[error("Subscriptions must be created inside a Tokio runtime")]
    NoRuntime,

    #[error("Feed I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid feed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
