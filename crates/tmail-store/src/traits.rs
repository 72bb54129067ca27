//! The capabilities the ingestion kernel consumes from storage.
//!
//! They are split in two so the lineage check can only ask questions and the
//! persist step can only write. A single backend usually implements both.

use std::sync::Arc;

use async_trait::async_trait;
use tmail_core::{Message, MessageId};

use crate::error::Result;

/// Answer of an existence query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// A message with this identity has been admitted.
    Found,
    /// No message with this identity has been admitted.
    NotFound,
}

impl Lookup {
    /// Whether the identity was found.
    pub fn is_found(self) -> bool {
        matches!(self, Lookup::Found)
    }
}

impl From<bool> for Lookup {
    fn from(found: bool) -> Self {
        if found {
            Lookup::Found
        } else {
            Lookup::NotFound
        }
    }
}

/// Result of persisting a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutResult {
    /// The message was new and is now stored.
    Stored,
    /// A message with this identity was already stored (idempotent - not an error).
    AlreadyStored,
}

/// Answers whether an identity has previously been admitted.
///
/// An `Err` means the oracle could not answer. Callers must never read it as
/// [`Lookup::NotFound`].
#[async_trait]
pub trait ExistenceOracle: Send + Sync {
    /// Check whether a message with this exact identity exists.
    async fn exists(&self, id: &MessageId) -> Result<Lookup>;
}

/// Durably persists identified messages.
///
/// # Contract
///
/// Once `put` returns `Ok`, any later [`ExistenceOracle::exists`] for the
/// same identity on the same backend must return [`Lookup::Found`].
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// Persist a message under its identity.
    ///
    /// # Returns
    /// - `Stored` if the message was new.
    /// - `AlreadyStored` if this identity is already present.
    async fn put(&self, message: &Message) -> Result<PutResult>;
}

#[async_trait]
impl<T: ExistenceOracle + ?Sized> ExistenceOracle for Arc<T> {
    async fn exists(&self, id: &MessageId) -> Result<Lookup> {
        (**self).exists(id).await
    }
}

#[async_trait]
impl<T: StoreGateway + ?Sized> StoreGateway for Arc<T> {
    async fn put(&self, message: &Message) -> Result<PutResult> {
        (**self).put(message).await
    }
}
