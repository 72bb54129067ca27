//! In-memory implementation of the storage capabilities.
//!
//! Same semantics as SQLite, nothing persisted. Used by tests and by a host
//! started without a database path.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tmail_core::{Message, MessageId};

use crate::error::{Result, StoreError};
use crate::traits::{ExistenceOracle, Lookup, PutResult, StoreGateway};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; the
/// lock is never held across an await point.
#[derive(Default)]
pub struct MemoryStore {
    messages: RwLock<HashMap<MessageId, Message>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a stored message by identity.
    pub fn get(&self, id: &MessageId) -> Result<Option<Message>> {
        let messages = self.messages.read().map_err(|_| StoreError::Poisoned)?;
        Ok(messages.get(id).cloned())
    }

    /// Number of stored messages.
    pub fn len(&self) -> Result<usize> {
        let messages = self.messages.read().map_err(|_| StoreError::Poisoned)?;
        Ok(messages.len())
    }

    /// Whether the store holds no messages.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl ExistenceOracle for MemoryStore {
    async fn exists(&self, id: &MessageId) -> Result<Lookup> {
        let messages = self.messages.read().map_err(|_| StoreError::Poisoned)?;
        Ok(Lookup::from(messages.contains_key(id)))
    }
}

#[async_trait]
impl StoreGateway for MemoryStore {
    async fn put(&self, message: &Message) -> Result<PutResult> {
        let mut messages = self.messages.write().map_err(|_| StoreError::Poisoned)?;

        if messages.contains_key(message.id()) {
            return Ok(PutResult::AlreadyStored);
        }

        messages.insert(*message.id(), message.clone());
        Ok(PutResult::Stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmail_core::CandidateMessage;

    fn make_test_message(content: &str) -> Message {
        CandidateMessage::new("alice", "bob", 1234567890000)
            .content(content.as_bytes().to_vec())
            .into_body(None)
            .identify()
    }

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();
        let message = make_test_message("hello");

        assert_eq!(store.exists(message.id()).await.unwrap(), Lookup::NotFound);

        let result = store.put(&message).await.unwrap();
        assert_eq!(result, PutResult::Stored);

        assert_eq!(store.exists(message.id()).await.unwrap(), Lookup::Found);
        assert_eq!(store.get(message.id()).unwrap().unwrap(), message);
    }

    #[tokio::test]
    async fn test_memory_store_idempotent() {
        let store = MemoryStore::new();
        let message = make_test_message("hello");

        assert_eq!(store.put(&message).await.unwrap(), PutResult::Stored);
        assert_eq!(store.put(&message).await.unwrap(), PutResult::AlreadyStored);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_distinct_messages() {
        let store = MemoryStore::new();
        assert!(store.is_empty().unwrap());

        store.put(&make_test_message("one")).await.unwrap();
        store.put(&make_test_message("two")).await.unwrap();
        assert_eq!(store.len().unwrap(), 2);
    }
}
