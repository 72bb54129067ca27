//! # tmail Kernel
//!
//! The identity-and-lineage core of the tmail ingestion gateway.
//!
//! ## Overview
//!
//! The kernel takes a decoded [`CandidateMessage`], and either admits it under
//! a content-derived identity or rejects it with one of five stable reasons:
//!
//! - **IdentityNotAllowed**: the client tried to pre-assign an id
//! - **MalformedReference**: the declared parent is not a well-formed id
//! - **ParentNotFound**: the declared parent was never admitted
//! - **OracleUnavailable**: the parent lookup could not be answered (retryable)
//! - **StoreFailure**: persisting the message failed (retryable)
//!
//! Storage is never looked up from ambient state: the existence oracle and
//! the store gateway are handed to [`Ingestor::new`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tmail_kernel::{CandidateMessage, Ingestor};
//! use tmail_kernel::store::MemoryStore;
//!
//! async fn example() {
//!     let ingestor = Ingestor::with_store(Arc::new(MemoryStore::new()));
//!
//!     let root = ingestor
//!         .ingest(CandidateMessage::new("alice", "bob", 0).content(b"hello".to_vec()))
//!         .await
//!         .unwrap();
//!
//!     let reply = CandidateMessage::new("bob", "alice", 1)
//!         .content(b"hi".to_vec())
//!         .child_of(&root.id);
//!     ingestor.ingest(reply).await.unwrap();
//! }
//! ```

pub mod error;
pub mod ingest;
pub mod lineage;

// Re-export component crates
pub use tmail_core as core;
pub use tmail_store as store;

pub use error::{ErrorClass, LineageError, Rejection};
pub use ingest::{Accepted, Ingestor};
pub use lineage::{Lineage, LineageValidator};

// Re-export commonly used core types
pub use tmail_core::{CandidateMessage, Message, MessageBody, MessageId};
pub use tmail_store::{ExistenceOracle, Lookup, PutResult, StoreGateway};
