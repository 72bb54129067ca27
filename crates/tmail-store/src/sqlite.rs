//! SQLite implementation of the storage capabilities.
//!
//! The durable backend. Uses rusqlite with bundled SQLite; every call runs on
//! a blocking worker via `tokio::task::spawn_blocking` so the connection
//! mutex is never held by an async task while it is suspended.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use tmail_core::{Message, MessageId};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{ExistenceOracle, Lookup, PutResult, StoreGateway};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. Writes are single statements, so a
/// successful `put` is committed before it returns.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection from a worker thread.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&conn)
        })
        .await?
    }

    /// Load a stored message, re-verifying its identity.
    pub async fn get(&self, id: &MessageId) -> Result<Option<Message>> {
        let id = *id;
        let canonical: Option<Vec<u8>> = self
            .run(move |conn| {
                conn.query_row(
                    "SELECT canonical_bytes FROM messages WHERE message_id = ?1",
                    params![id.0.as_slice()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(StoreError::from)
            })
            .await?;

        match canonical {
            Some(bytes) => Ok(Some(Message::from_canonical(id, bytes)?)),
            None => Ok(None),
        }
    }

    /// Number of stored messages.
    pub async fn count(&self) -> Result<u64> {
        self.run(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
            Ok(n.max(0) as u64)
        })
        .await
    }
}

#[async_trait]
impl ExistenceOracle for SqliteStore {
    async fn exists(&self, id: &MessageId) -> Result<Lookup> {
        let id = *id;
        self.run(move |conn| {
            let found: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM messages WHERE message_id = ?1)",
                params![id.0.as_slice()],
                |row| row.get(0),
            )?;
            Ok(Lookup::from(found))
        })
        .await
    }
}

#[async_trait]
impl StoreGateway for SqliteStore {
    async fn put(&self, message: &Message) -> Result<PutResult> {
        let message = message.clone();

        self.run(move |conn| {
            let body = message.body();
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO messages (
                    message_id, parent_id, sender, recipient, time,
                    content, canonical_bytes, ingested_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    message.id().0.as_slice(),
                    body.parent.as_ref().map(|id| id.0.to_vec()),
                    body.from,
                    body.to,
                    body.time,
                    &body.content[..],
                    message.canonical_bytes(),
                    now_millis(),
                ],
            )?;

            if inserted == 0 {
                tracing::debug!(id = %message.id(), "message already stored");
                Ok(PutResult::AlreadyStored)
            } else {
                Ok(PutResult::Stored)
            }
        })
        .await
    }
}

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmail_core::CandidateMessage;

    fn make_test_message(content: &str, parent: Option<MessageId>) -> Message {
        CandidateMessage::new("alice", "bob", 1234567890000)
            .content(content.as_bytes().to_vec())
            .into_body(parent)
            .identify()
    }

    #[tokio::test]
    async fn test_put_and_exists() {
        let store = SqliteStore::open_memory().unwrap();
        let message = make_test_message("hello", None);

        assert_eq!(store.exists(message.id()).await.unwrap(), Lookup::NotFound);

        let result = store.put(&message).await.unwrap();
        assert_eq!(result, PutResult::Stored);

        // Visible as soon as put returns.
        assert_eq!(store.exists(message.id()).await.unwrap(), Lookup::Found);
    }

    #[tokio::test]
    async fn test_idempotent_put() {
        let store = SqliteStore::open_memory().unwrap();
        let message = make_test_message("hello", None);

        assert_eq!(store.put(&message).await.unwrap(), PutResult::Stored);
        assert_eq!(store.put(&message).await.unwrap(), PutResult::AlreadyStored);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_reverifies_identity() {
        let store = SqliteStore::open_memory().unwrap();
        let root = make_test_message("root", None);
        let child = make_test_message("child", Some(*root.id()));

        store.put(&root).await.unwrap();
        store.put(&child).await.unwrap();

        let loaded = store.get(child.id()).await.unwrap().unwrap();
        assert_eq!(loaded, child);
        assert_eq!(loaded.parent(), Some(root.id()));

        let missing = MessageId::from_bytes([0x99; 32]);
        assert!(store.get(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_detects_tampered_bytes() {
        let store = SqliteStore::open_memory().unwrap();
        let message = make_test_message("hello", None);
        store.put(&message).await.unwrap();

        let id = *message.id();
        let tampered = make_test_message("goodbye", None);
        let bytes = tampered.canonical_bytes().to_vec();
        store
            .run(move |conn| {
                conn.execute(
                    "UPDATE messages SET canonical_bytes = ?1 WHERE message_id = ?2",
                    params![bytes, id.0.as_slice()],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        assert!(matches!(
            store.get(&id).await,
            Err(StoreError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tmail.db");
        let message = make_test_message("durable", None);

        {
            let store = SqliteStore::open(&path).unwrap();
            store.put(&message).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.exists(message.id()).await.unwrap(), Lookup::Found);
        assert_eq!(store.put(&message).await.unwrap(), PutResult::AlreadyStored);
    }
}
