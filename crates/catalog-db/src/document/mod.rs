//! # Document Store Contract
//!
//! The generic collection client every repository is written against.
//!
//! ## The Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    DocumentCollection<R>                                │
//! │                                                                         │
//! │  filter_by(&Filter)                 → Vec<R>     (lookup)               │
//! │  insert_one(R)                      → id         (assigns fresh _id)    │
//! │  replace_one(&R)                    → ()         (by _id, NotFound)     │
//! │  update_one(&Filter, &[FieldUpdate])→ matched    (atomic, first match)  │
//! │                                                                         │
//! │  Implementations:                                                       │
//! │  ├── MemoryCollection  (RwLock<Vec<Value>>, process-local)              │
//! │  └── SqliteCollection  (documents table, JSON bodies, sqlx)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records travel as JSON objects, so filters and field updates address
//! fields by their serialized name.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;

use crate::error::DbResult;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryCollection;
pub use sqlite::SqliteCollection;

/// Serialized name of the internal identifier field.
pub const ID_FIELD: &str = "_id";

// =============================================================================
// Document
// =============================================================================

/// A record that can live in a document collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Name of the collection holding records of this type.
    const COLLECTION: &'static str;

    /// Internal identifier, `None` until the store assigns one on insert.
    fn id(&self) -> Option<&str>;

    /// Sets the internal identifier.
    fn set_id(&mut self, id: String);
}

// =============================================================================
// Filter
// =============================================================================

/// A predicate over record fields.
///
/// Field names are `'static` so they always come from code, never from input.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every record.
    All,
    /// Field equals the value.
    Eq(&'static str, Value),
    /// String field contains the substring (case-sensitive).
    Contains(&'static str, String),
    /// Integer field is greater than or equal to the bound.
    Gte(&'static str, i64),
    /// Integer field is less than or equal to the bound.
    Lte(&'static str, i64),
    /// Every inner filter matches.
    And(Vec<Filter>),
}

impl Filter {
    /// Equality filter from anything serializable into a JSON value.
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Eq(field, value.into())
    }

    /// Substring filter.
    pub fn contains(field: &'static str, needle: impl Into<String>) -> Self {
        Filter::Contains(field, needle.into())
    }

    /// Conjunction with another filter.
    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::And(mut inner) => {
                inner.push(other);
                Filter::And(inner)
            }
            first => Filter::And(vec![first, other]),
        }
    }

    /// Evaluates the filter against a JSON document.
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, expected) => doc.get(*field) == Some(expected),
            Filter::Contains(field, needle) => doc
                .get(*field)
                .and_then(Value::as_str)
                .is_some_and(|s| s.contains(needle.as_str())),
            Filter::Gte(field, bound) => doc
                .get(*field)
                .and_then(Value::as_i64)
                .is_some_and(|n| n >= *bound),
            Filter::Lte(field, bound) => doc
                .get(*field)
                .and_then(Value::as_i64)
                .is_some_and(|n| n <= *bound),
            Filter::And(inner) => inner.iter().all(|f| f.matches(doc)),
        }
    }
}

// =============================================================================
// Field Update
// =============================================================================

/// A single field-level change applied by [`DocumentCollection::update_one`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Overwrites the field.
    Set(&'static str, Value),
    /// Adds a signed delta to an integer field (a missing field counts as 0).
    ///
    /// A record whose field would overflow `i64` does not match.
    Inc(&'static str, i64),
}

impl FieldUpdate {
    /// Set from anything convertible into a JSON value.
    pub fn set(field: &'static str, value: impl Into<Value>) -> Self {
        FieldUpdate::Set(field, value.into())
    }

    /// Whether the change can be applied to `doc` without overflow.
    pub fn fits(&self, doc: &Value) -> bool {
        match self {
            FieldUpdate::Set(..) => true,
            FieldUpdate::Inc(field, delta) => inc_target(doc, field, *delta).is_some(),
        }
    }

    /// Applies the change to a JSON document in place.
    ///
    /// An increment that does not [`fit`](FieldUpdate::fits) is skipped.
    pub fn apply(&self, doc: &mut Value) {
        let next = match self {
            FieldUpdate::Set(_, value) => Some(value.clone()),
            FieldUpdate::Inc(field, delta) => inc_target(doc, field, *delta).map(Value::from),
        };
        let (Some(object), Some(next)) = (doc.as_object_mut(), next) else {
            return;
        };
        let field = match self {
            FieldUpdate::Set(field, _) | FieldUpdate::Inc(field, _) => *field,
        };
        object.insert(field.to_string(), next);
    }
}

fn inc_target(doc: &Value, field: &str, delta: i64) -> Option<i64> {
    match doc.get(field) {
        None | Some(Value::Null) => Some(delta),
        Some(current) => current.as_i64()?.checked_add(delta),
    }
}

// =============================================================================
// Collection
// =============================================================================

/// Generic document collection client.
///
/// The contract promises no ordering for `filter_by`; both bundled backends
/// return insertion order. Callers needing one record take the first element.
#[async_trait]
pub trait DocumentCollection<R: Document>: Debug + Send + Sync {
    /// Returns every record matching the filter (possibly none).
    async fn filter_by(&self, filter: &Filter) -> DbResult<Vec<R>>;

    /// Stores a new record under a freshly assigned internal identifier.
    ///
    /// Any identifier already present on `record` is ignored.
    async fn insert_one(&self, record: R) -> DbResult<String>;

    /// Overwrites the record sharing `record`'s internal identifier.
    ///
    /// Fails with `NotFound` if the identifier is missing or unknown.
    async fn replace_one(&self, record: &R) -> DbResult<()>;

    /// Applies `updates` to the first record matching `filter` atomically.
    ///
    /// Returns the number of records updated (0 or 1).
    async fn update_one(&self, filter: &Filter, updates: &[FieldUpdate]) -> DbResult<u64>;

    /// Returns the first record matching the filter.
    async fn find_one(&self, filter: &Filter) -> DbResult<Option<R>> {
        Ok(self.filter_by(filter).await?.into_iter().next())
    }
}

/// Fresh internal identifier for a new document.
pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
