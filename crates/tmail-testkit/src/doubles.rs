//! Storage doubles for exercising failure and concurrency paths.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tmail_core::{Message, MessageId};
use tmail_store::{ExistenceOracle, Lookup, PutResult, Result, StoreError, StoreGateway};

/// An oracle that can never answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableOracle;

#[async_trait]
impl ExistenceOracle for UnavailableOracle {
    async fn exists(&self, _id: &MessageId) -> Result<Lookup> {
        Err(StoreError::Unavailable("oracle offline".into()))
    }
}

/// A gateway whose every write fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingGateway;

#[async_trait]
impl StoreGateway for FailingGateway {
    async fn put(&self, _message: &Message) -> Result<PutResult> {
        Err(StoreError::Unavailable("gateway offline".into()))
    }
}

/// Wraps a backend and counts calls into it.
#[derive(Debug, Default)]
pub struct CountingStore<S> {
    inner: S,
    exists_calls: AtomicUsize,
    put_calls: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            exists_calls: AtomicUsize::new(0),
            put_calls: AtomicUsize::new(0),
        }
    }

    /// Number of `exists` calls so far.
    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    /// Number of `put` calls so far.
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ExistenceOracle> ExistenceOracle for CountingStore<S> {
    async fn exists(&self, id: &MessageId) -> Result<Lookup> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.exists(id).await
    }
}

#[async_trait]
impl<S: StoreGateway> StoreGateway for CountingStore<S> {
    async fn put(&self, message: &Message) -> Result<PutResult> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.put(message).await
    }
}

/// Wraps a backend and suspends before every call, so concurrent requests
/// interleave at the I/O boundary.
#[derive(Debug)]
pub struct SlowStore<S> {
    inner: S,
    latency: Duration,
}

impl<S> SlowStore<S> {
    pub fn new(inner: S, latency: Duration) -> Self {
        Self { inner, latency }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ExistenceOracle> ExistenceOracle for SlowStore<S> {
    async fn exists(&self, id: &MessageId) -> Result<Lookup> {
        tokio::time::sleep(self.latency).await;
        self.inner.exists(id).await
    }
}

#[async_trait]
impl<S: StoreGateway> StoreGateway for SlowStore<S> {
    async fn put(&self, message: &Message) -> Result<PutResult> {
        tokio::time::sleep(self.latency).await;
        self.inner.put(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::root;
    use tmail_store::MemoryStore;

    #[tokio::test]
    async fn test_counting_store_counts() {
        let store = CountingStore::new(MemoryStore::new());
        let message = root("hello").into_body(None).identify();

        store.exists(message.id()).await.unwrap();
        store.put(&message).await.unwrap();
        store.put(&message).await.unwrap();

        assert_eq!(store.exists_calls(), 1);
        assert_eq!(store.put_calls(), 2);
        assert_eq!(store.inner().len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failing_doubles_fail() {
        let message = root("hello").into_body(None).identify();
        assert!(UnavailableOracle.exists(message.id()).await.is_err());
        assert!(FailingGateway.put(&message).await.is_err());
    }

    #[tokio::test]
    async fn test_slow_store_passes_through() {
        let store = SlowStore::new(MemoryStore::new(), Duration::from_millis(1));
        let message = root("hello").into_body(None).identify();

        assert_eq!(store.put(&message).await.unwrap(), PutResult::Stored);
        assert_eq!(store.exists(message.id()).await.unwrap(), Lookup::Found);
    }
}
