use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{parse_id, BookStore, StoreResult};
use crate::modules::books::models::{Book, BookDraft, BookField, BookPatch};

/// Process-local book store used for development and tests.
///
/// Ids are ObjectIds, so identifier validation matches the MongoDB backend.
#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_book(draft: BookDraft) -> Book {
        draft.into_book(ObjectId::new().to_hex())
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.books.read().await.len() as u64)
    }

    async fn insert(&self, draft: BookDraft) -> StoreResult<Book> {
        let book = Self::new_book(draft);
        self.books.write().await.push(book.clone());
        Ok(book)
    }

    async fn insert_many(&self, drafts: Vec<BookDraft>) -> StoreResult<()> {
        let mut books = self.books.write().await;
        books.extend(drafts.into_iter().map(Self::new_book));
        Ok(())
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        Ok(self.books.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Book>> {
        let id = parse_id(id)?.to_hex();
        let books = self.books.read().await;
        Ok(books.iter().find(|book| book.id == id).cloned())
    }

    async fn find_one_by(&self, field: BookField, value: &str) -> StoreResult<Option<Book>> {
        let books = self.books.read().await;
        Ok(books
            .iter()
            .find(|book| field.value_of(book) == Some(value))
            .cloned())
    }

    async fn update_by_id(&self, id: &str, patch: BookPatch) -> StoreResult<Option<Book>> {
        let id = parse_id(id)?.to_hex();
        let mut books = self.books.write().await;
        Ok(books.iter_mut().find(|book| book.id == id).map(|book| {
            patch.apply_to(book);
            book.clone()
        }))
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let id = parse_id(id)?.to_hex();
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|book| book.id != id);
        Ok(books.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::store::StoreError;

    const ABSENT_ID: &str = "000000000000000000000000";

    #[tokio::test]
    async fn inserted_book_round_trips() {
        let store = MemoryBookStore::new();
        let draft = BookDraft::new("X", "Y", "Z");

        let created = store.insert(draft.clone()).await.unwrap();
        let found = store.find_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(found, draft.into_book(created.id.clone()));
        assert_eq!(created.id.len(), 24);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = MemoryBookStore::new();
        let a = store.insert(BookDraft::default()).await.unwrap();
        let b = store.insert(BookDraft::default()).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn update_replaces_only_patched_fields() {
        let store = MemoryBookStore::new();
        let created = store.insert(BookDraft::new("X", "Y", "Z")).await.unwrap();

        let patch = BookPatch {
            name: Some("renamed".to_string()),
            ..BookPatch::default()
        };
        let updated = store
            .update_by_id(&created.id, patch)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name.as_deref(), Some("renamed"));
        assert_eq!(updated.img.as_deref(), Some("Y"));
        assert_eq!(updated.summary.as_deref(), Some("Z"));
        assert_eq!(store.find_by_id(&created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn deleted_book_is_gone() {
        let store = MemoryBookStore::new();
        let created = store.insert(BookDraft::new("X", "Y", "Z")).await.unwrap();

        assert!(store.delete_by_id(&created.id).await.unwrap());
        assert_eq!(store.find_by_id(&created.id).await.unwrap(), None);
        assert!(!store.delete_by_id(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn absent_ids_are_not_found() {
        let store = MemoryBookStore::new();
        assert_eq!(store.find_by_id(ABSENT_ID).await.unwrap(), None);
        assert_eq!(
            store
                .update_by_id(ABSENT_ID, BookPatch::default())
                .await
                .unwrap(),
            None
        );
        assert!(!store.delete_by_id(ABSENT_ID).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_ids_are_rejected() {
        let store = MemoryBookStore::new();
        assert!(matches!(
            store.find_by_id("nope").await,
            Err(StoreError::InvalidId(_))
        ));
        assert!(matches!(
            store.delete_by_id("nope").await,
            Err(StoreError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn find_one_by_returns_first_match() {
        let store = MemoryBookStore::new();
        let first = store.insert(BookDraft::new("Dup", "a", "1")).await.unwrap();
        store.insert(BookDraft::new("Dup", "b", "2")).await.unwrap();

        let found = store.find_one_by(BookField::Name, "Dup").await.unwrap();
        assert_eq!(found, Some(first));
        assert_eq!(
            store.find_one_by(BookField::Img, "missing").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn insert_many_appends_every_draft() {
        let store = MemoryBookStore::new();
        store
            .insert_many(vec![BookDraft::new("A", "", ""), BookDraft::new("B", "", "")])
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.find_all().await.unwrap().len(), 2);
    }
}
