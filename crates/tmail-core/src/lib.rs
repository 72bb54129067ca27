//! # tmail Core
//!
//! Pure primitives for tmail message ingestion: content identity, canonical
//! encoding, and the message shapes that flow through the ingestion kernel.
//!
//! This crate contains no I/O, no storage, no networking. Everything here is
//! a deterministic function of its inputs.
//!
//! ## Key Types
//!
//! - [`MessageId`] - Content-addressed identifier (BLAKE3 digest)
//! - [`MessageBody`] - The hashed part of a message (everything but the id)
//! - [`Message`] - An identified message, ready to hand to storage
//! - [`CandidateMessage`] - The decoded, untrusted shape a client submits
//!
//! ## Canonicalization
//!
//! Message bodies are encoded using deterministic CBOR. See [`canonical`].

pub mod canonical;
pub mod digest;
pub mod error;
pub mod message;
pub mod types;

pub use canonical::{canonical_body_bytes, decode_body};
pub use digest::{compute_id, ID_CONTEXT};
pub use error::{CoreError, ParseIdError};
pub use message::{CandidateMessage, Message, MessageBody};
pub use types::{MessageId, MESSAGE_ID_LEN, MESSAGE_ID_TEXT_LEN};
