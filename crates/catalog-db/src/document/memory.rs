//! # In-Memory Collection
//!
//! Process-local [`DocumentCollection`] backed by a `tokio::sync::RwLock`.
//!
//! Documents are held as JSON objects in insertion order, which is the order
//! `filter_by` returns them in. `update_one` runs its lookup and write under
//! a single write lock, so it is atomic with respect to every other call on
//! the same collection.

use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{new_document_id, Document, DocumentCollection, FieldUpdate, Filter, ID_FIELD};
use crate::error::{DbError, DbResult};

/// In-memory document collection.
///
/// Cloning shares the underlying documents.
#[derive(Debug)]
pub struct MemoryCollection<R> {
    docs: Arc<RwLock<Vec<Value>>>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for MemoryCollection<R> {
    fn clone(&self) -> Self {
        MemoryCollection {
            docs: Arc::clone(&self.docs),
            _record: PhantomData,
        }
    }
}

impl<R> Default for MemoryCollection<R> {
    fn default() -> Self {
        MemoryCollection {
            docs: Arc::new(RwLock::new(Vec::new())),
            _record: PhantomData,
        }
    }
}

impl<R> MemoryCollection<R> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Checks whether the collection holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

fn doc_id(doc: &Value) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

#[async_trait]
impl<R: Document> DocumentCollection<R> for MemoryCollection<R> {
    async fn filter_by(&self, filter: &Filter) -> DbResult<Vec<R>> {
        let docs = self.docs.read().await;

        docs.iter()
            .filter(|doc| filter.matches(doc))
            .map(|doc| serde_json::from_value::<R>(doc.clone()).map_err(DbError::from))
            .collect()
    }

    async fn insert_one(&self, mut record: R) -> DbResult<String> {
        let id = new_document_id();
        record.set_id(id.clone());
        let doc = serde_json::to_value(&record)?;

        self.docs.write().await.push(doc);

        debug!(collection = R::COLLECTION, id = %id, "Inserted document");
        Ok(id)
    }

    async fn replace_one(&self, record: &R) -> DbResult<()> {
        let id = record
            .id()
            .ok_or_else(|| DbError::not_found(R::COLLECTION, "<missing _id>"))?;
        let replacement = serde_json::to_value(record)?;

        let mut docs = self.docs.write().await;
        let slot = docs
            .iter_mut()
            .find(|doc| doc_id(doc) == Some(id))
            .ok_or_else(|| DbError::not_found(R::COLLECTION, id))?;
        *slot = replacement;

        debug!(collection = R::COLLECTION, id = %id, "Replaced document");
        Ok(())
    }

    async fn update_one(&self, filter: &Filter, updates: &[FieldUpdate]) -> DbResult<u64> {
        let mut docs = self.docs.write().await;

        let Some(doc) = docs
            .iter_mut()
            .find(|doc| filter.matches(doc) && updates.iter().all(|u| u.fits(doc)))
        else {
            return Ok(0);
        };
        for update in updates {
            update.apply(doc);
        }

        debug!(
            collection = R::COLLECTION,
            id = doc_id(doc).unwrap_or_default(),
            "Updated document fields"
        );
        Ok(1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
