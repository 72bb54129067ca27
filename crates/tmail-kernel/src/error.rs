//! Rejection reasons surfaced by the ingestion kernel.

use thiserror::Error;
use tmail_core::{MessageId, ParseIdError};
use tmail_store::StoreError;

/// Whose fault a rejection is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request is invalid; resubmitting it unchanged will fail again.
    Client,
    /// A dependency failed; resubmitting the same request may succeed.
    Transient,
}

/// Why a candidate message was not admitted.
///
/// Every variant has a stable [`code`](Rejection::code) so callers can tell
/// "your request is invalid" from "try again later" without parsing text.
#[derive(Debug, Error)]
pub enum Rejection {
    /// The candidate carried a non-empty identity field.
    #[error("client-supplied message id is not allowed")]
    IdentityNotAllowed,

    /// The declared parent does not decode to a well-formed id.
    #[error("malformed parent reference: {0}")]
    MalformedReference(#[source] ParseIdError),

    /// The declared parent has not been admitted.
    #[error("parent message not found: {0}")]
    ParentNotFound(MessageId),

    /// The existence oracle could not answer.
    #[error("existence oracle unavailable: {0}")]
    OracleUnavailable(#[source] StoreError),

    /// The store gateway failed to persist the message.
    #[error("store failure: {0}")]
    StoreFailure(#[source] StoreError),
}

impl Rejection {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::IdentityNotAllowed => "identity_not_allowed",
            Rejection::MalformedReference(_) => "malformed_reference",
            Rejection::ParentNotFound(_) => "parent_not_found",
            Rejection::OracleUnavailable(_) => "oracle_unavailable",
            Rejection::StoreFailure(_) => "store_failure",
        }
    }

    /// Client error or transient dependency error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Rejection::IdentityNotAllowed
            | Rejection::MalformedReference(_)
            | Rejection::ParentNotFound(_) => ErrorClass::Client,
            Rejection::OracleUnavailable(_) | Rejection::StoreFailure(_) => ErrorClass::Transient,
        }
    }

    /// Whether resubmitting the same candidate may succeed.
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }
}

/// Lineage check failures. A subset of [`Rejection`].
#[derive(Debug, Error)]
pub enum LineageError {
    #[error("malformed parent reference: {0}")]
    MalformedReference(#[source] ParseIdError),

    #[error("parent message not found: {0}")]
    ParentNotFound(MessageId),

    #[error("existence oracle unavailable: {0}")]
    OracleUnavailable(#[source] StoreError),
}

impl From<LineageError> for Rejection {
    fn from(e: LineageError) -> Self {
        match e {
            LineageError::MalformedReference(e) => Rejection::MalformedReference(e),
            LineageError::ParentNotFound(id) => Rejection::ParentNotFound(id),
            LineageError::OracleUnavailable(e) => Rejection::OracleUnavailable(e),
        }
    }
}
