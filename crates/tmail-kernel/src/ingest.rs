//! The ingestion core: guard, identify, check lineage, persist.
//!
//! Each call is request-scoped. Nothing durable happens before the single
//! `put`, so a caller that drops the future mid-flight leaves no trace, and
//! a caller that retries after a transient failure recomputes the same id.

use std::sync::Arc;

use tmail_core::{CandidateMessage, MessageId};
use tmail_store::{ExistenceOracle, PutResult, StoreGateway};

use crate::error::Rejection;
use crate::lineage::{Lineage, LineageValidator};

/// A successfully admitted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    /// The content-derived identity.
    pub id: MessageId,
    /// What the store gateway did with it.
    pub disposition: PutResult,
}

impl Accepted {
    /// Whether the store already held this identity.
    pub fn is_duplicate(&self) -> bool {
        self.disposition == PutResult::AlreadyStored
    }
}

/// The ingestion core.
///
/// Holds no mutable state of its own; concurrent `ingest` calls only meet
/// inside the oracle and gateway.
pub struct Ingestor<O: ExistenceOracle, G: StoreGateway> {
    lineage: LineageValidator<O>,
    gateway: Arc<G>,
}

impl<O: ExistenceOracle, G: StoreGateway> Clone for Ingestor<O, G> {
    fn clone(&self) -> Self {
        Self {
            lineage: self.lineage.clone(),
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<S: ExistenceOracle + StoreGateway> Ingestor<S, S> {
    /// Create an ingestor whose oracle and gateway are the same backend.
    pub fn with_store(store: Arc<S>) -> Self {
        Self::new(Arc::clone(&store), store)
    }
}

impl<O: ExistenceOracle, G: StoreGateway> Ingestor<O, G> {
    /// Create an ingestor from its two storage capabilities.
    ///
    /// For lineage to be sound, `gateway` writes must be visible to `oracle`
    /// before `put` returns.
    pub fn new(oracle: Arc<O>, gateway: Arc<G>) -> Self {
        Self {
            lineage: LineageValidator::new(oracle),
            gateway,
        }
    }

    /// The lineage validator this ingestor uses.
    pub fn lineage(&self) -> &LineageValidator<O> {
        &self.lineage
    }

    /// Admit or reject a candidate message.
    pub async fn ingest(&self, candidate: CandidateMessage) -> Result<Accepted, Rejection> {
        let result = self.admit(candidate).await;

        match &result {
            Ok(accepted) => {
                tracing::debug!(
                    id = %accepted.id,
                    duplicate = accepted.is_duplicate(),
                    "message accepted"
                );
            }
            Err(rejection) if rejection.is_retryable() => {
                tracing::warn!(reason = rejection.code(), error = %rejection, "ingestion failed");
            }
            Err(rejection) => {
                tracing::info!(reason = rejection.code(), error = %rejection, "message rejected");
            }
        }

        result
    }

    async fn admit(&self, candidate: CandidateMessage) -> Result<Accepted, Rejection> {
        // 1. Clients never choose identities
        if candidate.declares_identity() {
            return Err(Rejection::IdentityNotAllowed);
        }

        // 2. Decode the parent reference (pure; the parent is part of the hashed body)
        let parent = LineageValidator::<O>::resolve_reference(candidate.parent_id.as_deref())?;

        // 3. Canonicalize and assign identity
        let message = candidate.into_body(parent).identify();

        // 4. Parent must already be admitted
        let lineage = self.lineage.check_parent(parent).await?;
        debug_assert_eq!(lineage.parent(), message.parent());
        if let Lineage::Child(parent) = lineage {
            tracing::trace!(id = %message.id(), %parent, "lineage verified");
        }

        // 5. Persist exactly once
        let disposition = self
            .gateway
            .put(&message)
            .await
            .map_err(Rejection::StoreFailure)?;

        Ok(Accepted {
            id: *message.id(),
            disposition,
        })
    }
}
