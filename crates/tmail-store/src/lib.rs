//! # tmail Store
//!
//! The storage-side capabilities the ingestion kernel consumes, and two
//! backends that provide them.
//!
//! ## Key Types
//!
//! - [`ExistenceOracle`] - answers "has this identity been admitted?"
//! - [`StoreGateway`] - durably persists an identified message
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests and ephemeral hosts
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tmail_store::{ExistenceOracle, Lookup, SqliteStore, StoreGateway};
//! use tmail_core::CandidateMessage;
//!
//! async fn example() {
//!     let store = SqliteStore::open("tmail.db").unwrap();
//!
//!     let message = CandidateMessage::new("alice", "bob", 0)
//!         .content(b"hello".to_vec())
//!         .into_body(None)
//!         .identify();
//!
//!     store.put(&message).await.unwrap();
//!     assert_eq!(store.exists(message.id()).await.unwrap(), Lookup::Found);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Idempotent puts**: storing the same identity twice returns `AlreadyStored`
//! - **Read-your-writes**: once `put` returns, `exists` observes the message
//! - **No ambient state**: every backend is an explicit value handed to the kernel

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ExistenceOracle, Lookup, PutResult, StoreGateway};
