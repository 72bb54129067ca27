//! Lineage validation: checking a declared parent against admitted state.
//!
//! The check has two halves. Decoding the reference is pure and happens
//! before anything touches storage; asking whether the parent exists goes
//! through the [`ExistenceOracle`]. A malformed reference therefore never
//! produces a store lookup, and an oracle failure is never read as absence.

use std::sync::Arc;

use tmail_core::{CandidateMessage, MessageId};
use tmail_store::{ExistenceOracle, Lookup};

use crate::error::LineageError;

/// Where a message sits in the lineage graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lineage {
    /// No parent declared.
    Root,
    /// Attaches to an already admitted message.
    Child(MessageId),
}

impl Lineage {
    /// The parent identity, if any.
    pub fn parent(&self) -> Option<&MessageId> {
        match self {
            Lineage::Root => None,
            Lineage::Child(id) => Some(id),
        }
    }
}

/// Validates declared parent references.
pub struct LineageValidator<O: ExistenceOracle> {
    oracle: Arc<O>,
}

impl<O: ExistenceOracle> Clone for LineageValidator<O> {
    fn clone(&self) -> Self {
        Self {
            oracle: Arc::clone(&self.oracle),
        }
    }
}

impl<O: ExistenceOracle> LineageValidator<O> {
    /// Create a validator backed by the given oracle.
    pub fn new(oracle: Arc<O>) -> Self {
        Self { oracle }
    }

    /// Decode a declared parent reference.
    ///
    /// `None` means no parent was declared. `Some("")` is a declared but
    /// malformed reference: nothing is trimmed or repaired.
    pub fn resolve_reference(parent_ref: Option<&str>) -> Result<Option<MessageId>, LineageError> {
        parent_ref
            .map(|s| MessageId::parse(s).map_err(LineageError::MalformedReference))
            .transpose()
    }

    /// Check that a decoded parent has been admitted.
    pub async fn check_parent(&self, parent: Option<MessageId>) -> Result<Lineage, LineageError> {
        let Some(parent) = parent else {
            return Ok(Lineage::Root);
        };

        match self.oracle.exists(&parent).await {
            Ok(Lookup::Found) => Ok(Lineage::Child(parent)),
            Ok(Lookup::NotFound) => Err(LineageError::ParentNotFound(parent)),
            Err(e) => Err(LineageError::OracleUnavailable(e)),
        }
    }

    /// Decide whether a candidate's declared lineage is admissible.
    pub async fn validate(&self, candidate: &CandidateMessage) -> Result<Lineage, LineageError> {
        let parent = Self::resolve_reference(candidate.parent_id.as_deref())?;
        self.check_parent(parent).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmail_store::{MemoryStore, StoreGateway};
    use tmail_testkit::doubles::{CountingStore, UnavailableOracle};

    fn root_candidate() -> CandidateMessage {
        CandidateMessage::new("alice", "bob", 0).content(b"root".to_vec())
    }

    #[tokio::test]
    async fn test_root_admitted_without_lookup() {
        let oracle = Arc::new(CountingStore::new(MemoryStore::new()));
        let validator = LineageValidator::new(Arc::clone(&oracle));

        let lineage = validator.validate(&root_candidate()).await.unwrap();
        assert_eq!(lineage, Lineage::Root);
        assert_eq!(oracle.exists_calls(), 0);
    }

    #[tokio::test]
    async fn test_known_parent_admitted() {
        let store = MemoryStore::new();
        let parent = root_candidate().into_body(None).identify();
        store.put(&parent).await.unwrap();

        let validator = LineageValidator::new(Arc::new(store));
        let child = CandidateMessage::new("bob", "alice", 1).child_of(parent.id());

        let lineage = validator.validate(&child).await.unwrap();
        assert_eq!(lineage, Lineage::Child(*parent.id()));
        assert_eq!(lineage.parent(), Some(parent.id()));
    }

    #[tokio::test]
    async fn test_unknown_parent_rejected() {
        let validator = LineageValidator::new(Arc::new(MemoryStore::new()));
        let ghost = MessageId::from_bytes([0x5a; 32]);
        let child = CandidateMessage::new("bob", "alice", 1).child_of(&ghost);

        let err = validator.validate(&child).await.unwrap_err();
        assert!(matches!(err, LineageError::ParentNotFound(id) if id == ghost));
    }

    #[tokio::test]
    async fn test_malformed_reference_never_queries_oracle() {
        let oracle = Arc::new(CountingStore::new(MemoryStore::new()));
        let validator = LineageValidator::new(Arc::clone(&oracle));

        let valid = MessageId::from_bytes([0x11; 32]).to_text();
        for bad in [
            "not-a-real-id".to_string(),
            String::new(),
            format!(" {}", &valid[1..]),
            format!("{}=", &valid[..42]),
            MessageId::from_bytes([0x11; 32]).to_hex(),
        ] {
            let child = CandidateMessage::new("bob", "alice", 1).parent(bad.clone());
            let err = validator.validate(&child).await.unwrap_err();
            assert!(
                matches!(err, LineageError::MalformedReference(_)),
                "expected malformed for {bad:?}, got {err:?}"
            );
        }
        assert_eq!(oracle.exists_calls(), 0);
    }

    #[tokio::test]
    async fn test_oracle_failure_is_not_not_found() {
        let validator = LineageValidator::new(Arc::new(UnavailableOracle));
        let child = CandidateMessage::new("bob", "alice", 1)
            .child_of(&MessageId::from_bytes([0x22; 32]));

        let err = validator.validate(&child).await.unwrap_err();
        assert!(matches!(err, LineageError::OracleUnavailable(_)));
    }

    #[test]
    fn test_resolve_reference_absent() {
        let resolved = LineageValidator::<MemoryStore>::resolve_reference(None).unwrap();
        assert!(resolved.is_none());
    }
}
