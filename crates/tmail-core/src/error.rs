//! Error types for tmail core.

use thiserror::Error;

use crate::types::MessageId;

/// Errors from parsing the text form of a [`MessageId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIdError {
    #[error("invalid message id length: expected {expected}, got {got}")]
    Length { expected: usize, got: usize },

    #[error("invalid message id encoding: {0}")]
    Encoding(String),
}

/// Core errors that can occur while decoding or re-verifying messages.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("malformed message body: {0}")]
    MalformedBody(String),

    #[error("body bytes are not in canonical form")]
    NonCanonical,

    #[error("message id mismatch: expected {expected}, computed {actual}")]
    IdMismatch {
        expected: MessageId,
        actual: MessageId,
    },
}
