//! Message shapes: what a client submits, what gets hashed, what gets stored.
//!
//! A message is immutable once identified. Its id is never taken from the
//! client; it is always recomputed from the canonical body.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical::{canonical_body_bytes, decode_body};
use crate::digest::compute_id;
use crate::error::CoreError;
use crate::types::MessageId;

/// The hashed part of a message: every field except the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// The message this one attaches to. `None` for a root message.
    pub parent: Option<MessageId>,

    /// Sender identifier (opaque).
    pub from: String,

    /// Recipient identifier (opaque).
    pub to: String,

    /// Author-claimed timestamp. Untrusted, opaque to the kernel.
    pub time: i64,

    /// Payload bytes, preserved unmodified.
    pub content: Bytes,
}

impl MessageBody {
    /// Encode to canonical bytes.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonical_body_bytes(self)
    }

    /// Compute the identity this body would receive.
    pub fn compute_id(&self) -> MessageId {
        compute_id(&self.canonical_bytes())
    }

    /// Assign identity, producing an immutable [`Message`].
    pub fn identify(self) -> Message {
        let canonical = self.canonical_bytes();
        let id = compute_id(&canonical);
        Message {
            id,
            body: self,
            canonical,
        }
    }

    /// Whether this is a root message (no parent).
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// An identified message.
///
/// Fields are private: a `Message` can only be obtained by identifying a
/// body or by re-verifying stored canonical bytes, so `id` always matches
/// `canonical`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    body: MessageBody,
    canonical: Vec<u8>,
}

impl Message {
    /// Rebuild a message from stored canonical bytes, checking that the
    /// bytes still hash to `expected`.
    pub fn from_canonical(expected: MessageId, canonical: Vec<u8>) -> Result<Self, CoreError> {
        let body = decode_body(&canonical)?;
        let actual = compute_id(&canonical);
        if actual != expected {
            return Err(CoreError::IdMismatch { expected, actual });
        }
        Ok(Self {
            id: actual,
            body,
            canonical,
        })
    }

    /// The content identity.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// The hashed body.
    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    /// The canonical bytes the id was computed from.
    pub fn canonical_bytes(&self) -> &[u8] {
        &self.canonical
    }

    /// The parent reference, if any.
    pub fn parent(&self) -> Option<&MessageId> {
        self.body.parent.as_ref()
    }

    /// Consume into the body.
    pub fn into_body(self) -> MessageBody {
        self.body
    }
}

/// A decoded, not yet validated submission.
///
/// `id` and `parent_id` are kept as the client sent them: the kernel rejects
/// any non-empty `id` and decodes `parent_id` itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateMessage {
    /// Client-declared identity. Must be absent or empty.
    pub id: Option<String>,

    /// Text form of the parent's identity, if the message has one.
    pub parent_id: Option<String>,

    pub from: String,
    pub to: String,
    pub time: i64,
    pub content: Bytes,
}

impl CandidateMessage {
    /// A root candidate with the given content.
    pub fn new(from: impl Into<String>, to: impl Into<String>, time: i64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            time,
            ..Self::default()
        }
    }

    /// Set the content.
    pub fn content(mut self, content: impl Into<Bytes>) -> Self {
        self.content = content.into();
        self
    }

    /// Declare a parent by its text form.
    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Declare a parent by identity.
    pub fn child_of(self, parent: &MessageId) -> Self {
        self.parent(parent.to_text())
    }

    /// Set the client-declared identity field.
    pub fn declared_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Whether the client tried to pre-assign an identity.
    pub fn declares_identity(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Build the hashed body once the parent reference has been decoded.
    pub fn into_body(self, parent: Option<MessageId>) -> MessageBody {
        MessageBody {
            parent,
            from: self.from,
            to: self.to,
            time: self.time,
            content: self.content,
        }
    }
}
