use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

use super::{parse_id, BookStore, StoreResult};
use crate::modules::books::models::{Book, BookDraft, BookField, BookPatch};

/// Stored form of a book inside the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BookDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
}

impl BookDocument {
    fn from_draft(draft: BookDraft) -> Self {
        Self {
            id: ObjectId::new(),
            name: draft.name,
            img: draft.img,
            summary: draft.summary,
        }
    }
}

impl From<BookDocument> for Book {
    fn from(document: BookDocument) -> Self {
        Book {
            id: document.id.to_hex(),
            name: document.name,
            img: document.img,
            summary: document.summary,
        }
    }
}

fn id_filter(id: ObjectId) -> Document {
    doc! { "_id": id }
}

fn field_filter(field: BookField, value: &str) -> Document {
    let mut filter = Document::new();
    filter.insert(field.as_str(), value);
    filter
}

/// `$set` update touching only the fields present in `patch`.
fn set_update(patch: &BookPatch) -> Document {
    let mut set = Document::new();
    for (field, value) in patch.fields() {
        set.insert(field.as_str(), value);
    }
    doc! { "$set": set }
}

/// Book store over a MongoDB collection.
pub struct MongoBookStore {
    database: Database,
    collection: Collection<BookDocument>,
}

impl MongoBookStore {
    pub fn new(database: Database, collection: &str) -> Self {
        let collection = database.collection::<BookDocument>(collection);
        Self {
            database,
            collection,
        }
    }
}

#[async_trait]
impl BookStore for MongoBookStore {
    async fn ping(&self) -> StoreResult<()> {
        bookstore_db::ping(&self.database).await?;
        Ok(())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.collection.count_documents(None, None).await?)
    }

    async fn insert(&self, draft: BookDraft) -> StoreResult<Book> {
        let document = BookDocument::from_draft(draft);
        self.collection.insert_one(&document, None).await?;
        Ok(document.into())
    }

    async fn insert_many(&self, drafts: Vec<BookDraft>) -> StoreResult<()> {
        if drafts.is_empty() {
            return Ok(());
        }
        let documents: Vec<BookDocument> =
            drafts.into_iter().map(BookDocument::from_draft).collect();
        self.collection.insert_many(documents, None).await?;
        Ok(())
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        let documents: Vec<BookDocument> = self
            .collection
            .find(None, None)
            .await?
            .try_collect()
            .await?;
        Ok(documents.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Book>> {
        let id = parse_id(id)?;
        let document = self.collection.find_one(id_filter(id), None).await?;
        Ok(document.map(Book::from))
    }

    async fn find_one_by(&self, field: BookField, value: &str) -> StoreResult<Option<Book>> {
        let document = self
            .collection
            .find_one(field_filter(field, value), None)
            .await?;
        Ok(document.map(Book::from))
    }

    async fn update_by_id(&self, id: &str, patch: BookPatch) -> StoreResult<Option<Book>> {
        let id = parse_id(id)?;
        // An empty `$set` is rejected by the server.
        if patch.is_empty() {
            let document = self.collection.find_one(id_filter(id), None).await?;
            return Ok(document.map(Book::from));
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let document = self
            .collection
            .find_one_and_update(id_filter(id), set_update(&patch), options)
            .await?;
        Ok(document.map(Book::from))
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let id = parse_id(id)?;
        let result = self.collection.delete_one(id_filter(id), None).await?;
        Ok(result.deleted_count > 0)
    }
}
