//! Store doubles for exercising failure paths.

use async_trait::async_trait;

use super::{BookStore, StoreError, StoreResult};
use crate::modules::books::models::{Book, BookDraft, BookField, BookPatch};

pub(crate) const BACKEND_MESSAGE: &str = "server selection timeout";

#[derive(Debug, Clone, Copy)]
enum Ping {
    Fails,
    Succeeds,
    Hangs,
}

/// Store whose data operations all fail with a backend error. Only `ping`
/// varies between constructors.
pub(crate) struct FaultyStore {
    ping: Ping,
}

impl FaultyStore {
    /// Every operation fails, as if the server were down.
    pub(crate) fn unreachable() -> Self {
        Self { ping: Ping::Fails }
    }

    /// Answers `ping`, then fails every read and write.
    pub(crate) fn failing_after_ping() -> Self {
        Self {
            ping: Ping::Succeeds,
        }
    }

    /// `ping` never resolves.
    pub(crate) fn hanging() -> Self {
        Self { ping: Ping::Hangs }
    }
}

fn backend<T>() -> StoreResult<T> {
    Err(StoreError::Backend(BACKEND_MESSAGE.to_string()))
}

#[async_trait]
impl BookStore for FaultyStore {
    async fn ping(&self) -> StoreResult<()> {
        match self.ping {
            Ping::Fails => backend(),
            Ping::Succeeds => Ok(()),
            Ping::Hangs => std::future::pending().await,
        }
    }
    async fn count(&self) -> StoreResult<u64> {
        backend()
    }
    async fn insert(&self, _draft: BookDraft) -> StoreResult<Book> {
        backend()
    }
    async fn insert_many(&self, _drafts: Vec<BookDraft>) -> StoreResult<()> {
        backend()
    }
    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        backend()
    }
    async fn find_by_id(&self, _id: &str) -> StoreResult<Option<Book>> {
        backend()
    }
    async fn find_one_by(&self, _field: BookField, _value: &str) -> StoreResult<Option<Book>> {
        backend()
    }
    async fn update_by_id(&self, _id: &str, _patch: BookPatch) -> StoreResult<Option<Book>> {
        backend()
    }
    async fn delete_by_id(&self, _id: &str) -> StoreResult<bool> {
        backend()
    }
}
