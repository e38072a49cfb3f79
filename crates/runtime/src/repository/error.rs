//! Error types raised by match sinks.

use thiserror::Error;

/// Errors surfaced by [`MatchSink`](super::MatchSink) implementations.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("log already exists: {0}")]
    LogAlreadyExists(String),

    #[error("truncated frame at offset {offset}: expected {expected} bytes, found {actual}")]
    TruncatedFrame {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    #[error("log does not start with a match header")]
    MissingHeader,
}

pub type Result<T> = std::result::Result<T, SinkError>;
