//! # Repository Module
//!
//! Catalog repositories over the document store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Caller                                                                 │
//! │       │  catalog.products().update_value("C1", 12.50)                  │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── add / update                                                       │
//! │  ├── activate / deactivate / debit_stock / restock                      │
//! │  ├── update_value                                                       │
//! │  └── get_by_code / get_by_name / get_all                                │
//! │       │                                                                 │
//! │       │  filter_by / insert_one / replace_one / update_one              │
//! │       ▼                                                                 │
//! │  DocumentCollection<ProductRecord>  (memory or SQLite)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product catalog
//! - [`SupplierRepository`] - Supplier contract (no implementation yet)

use async_trait::async_trait;
use catalog_core::Supplier;
use uuid::Uuid;

use crate::error::DbResult;

pub mod product;

/// Operations a supplier store must provide.
///
/// No collection implements it yet; supplier records have no defined
/// persisted shape.
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn add(&self, supplier: &Supplier) -> DbResult<()>;

    async fn update(&self, supplier: &Supplier) -> DbResult<()>;

    async fn remove(&self, supplier: &Supplier) -> DbResult<()>;

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Supplier>>;

    async fn get_by_name(&self, fragment: &str) -> DbResult<Vec<Supplier>>;

    async fn deactivate(&self, supplier: &Supplier) -> DbResult<()>;

    async fn activate(&self, supplier: &Supplier) -> DbResult<()>;
}
