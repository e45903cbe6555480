//! Storage gateway for the books collection.

mod memory;
mod mongo;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use bookstore_kernel::settings::{DatabaseBackend, DatabaseSettings};
use mongodb::{bson::oid::ObjectId, error::ErrorKind};
use thiserror::Error;

use super::models::{Book, BookDraft, BookField, BookPatch};

pub use memory::MemoryBookStore;
pub use mongo::MongoBookStore;

/// Failure of a single storage operation.
///
/// Expected outcomes (a missing record) are not errors; operations report
/// them through `Option`/`bool` results instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier is not a syntactically valid ObjectId.
    #[error("invalid book id '{0}'")]
    InvalidId(String),

    /// A document could not be converted to or from its stored form.
    #[error("invalid book document: {0}")]
    InvalidDocument(String),

    /// Connectivity loss or any other database fault.
    #[error("{0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::BsonDeserialization(inner) => StoreError::InvalidDocument(inner.to_string()),
            ErrorKind::BsonSerialization(inner) => StoreError::InvalidDocument(inner.to_string()),
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Operations over the books collection.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Check that the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Number of stored books.
    async fn count(&self) -> StoreResult<u64>;

    /// Persist `draft` under a newly assigned id.
    async fn insert(&self, draft: BookDraft) -> StoreResult<Book>;

    /// Persist every draft as a new record. A failure part-way leaves the
    /// earlier records in place.
    async fn insert_many(&self, drafts: Vec<BookDraft>) -> StoreResult<()>;

    /// Every stored book, in no particular order.
    async fn find_all(&self) -> StoreResult<Vec<Book>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Book>>;

    /// First book whose `field` equals `value`.
    async fn find_one_by(&self, field: BookField, value: &str) -> StoreResult<Option<Book>>;

    /// Apply `patch` and return the post-update record.
    async fn update_by_id(&self, id: &str, patch: BookPatch) -> StoreResult<Option<Book>>;

    /// Returns true if the book existed and was deleted.
    async fn delete_by_id(&self, id: &str) -> StoreResult<bool>;
}

pub type SharedBookStore = Arc<dyn BookStore>;

/// Parse a client-supplied identifier.
pub(crate) fn parse_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// Build the backend selected in `settings`.
pub async fn from_settings(settings: &DatabaseSettings) -> anyhow::Result<SharedBookStore> {
    let store: SharedBookStore = match settings.backend {
        DatabaseBackend::Mongodb => {
            let database = bookstore_db::connect(settings).await?;
            Arc::new(MongoBookStore::new(database, &settings.collection))
        }
        DatabaseBackend::Memory => {
            tracing::warn!("using in-memory book store; records are lost on exit");
            Arc::new(MemoryBookStore::new())
        }
    };
    Ok(store)
}
