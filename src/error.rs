//! Error types for the snapshot reader

use thiserror::Error;

use crate::layout::RecordKind;

/// Snapshot reader errors
#[derive(Error, Debug)]
pub enum BookError {
    #[error("Truncated {kind} record: expected at least {expected} bytes, got {actual}")]
    TruncatedRecord {
        kind: RecordKind,
        expected: usize,
        actual: usize,
    },

    #[error("Record is not a {expected}: discriminator {}", hex::encode(.found))]
    UnknownRecordKind {
        expected: RecordKind,
        found: [u8; 8],
    },

    #[error("Malformed amount: {0}")]
    MalformedAmount(String),

    #[error("Division by zero: price tick must be non-zero")]
    DivideByZero,

    #[error("Invalid record address: {0}")]
    InvalidAddress(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BookError {
    /// True for errors raised while decoding bytes that were found
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            BookError::TruncatedRecord { .. } | BookError::UnknownRecordKind { .. }
        )
    }
}

impl From<std::io::Error> for BookError {
    fn from(err: std::io::Error) -> Self {
        BookError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for BookError {
    fn from(err: serde_json::Error) -> Self {
        BookError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BookError>;
