//! # catalog-db: Document Store Layer for the Product Catalog
//!
//! This crate persists catalog entities as JSON documents. It provides a
//! process-local store and a SQLite store behind one collection contract,
//! and the product repository built on top of it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  Caller (service, CLI, seed)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    catalog-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Catalog     │    │  Repositories │    │   Records    │  │   │
//! │  │   │ (catalog.rs)  │───►│ (product.rs)  │───►│ (record.rs)  │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                                ▼                               │   │
//! │  │              DocumentCollection<R> (document/)                 │   │
//! │  │               ┌───────────────┴───────────────┐                │   │
//! │  │               ▼                               ▼                │   │
//! │  │        MemoryCollection               SqliteCollection         │   │
//! │  │                                      Database (pool.rs)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`catalog`] - Opens the configured backend
//! - [`config`] - Environment-driven configuration
//! - [`document`] - Collection contract, filters, field updates, backends
//! - [`record`] - Entity ↔ record mapping
//! - [`repository`] - Product repository and supplier contract
//! - [`pool`] - SQLite connection pool
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_db::{Catalog, CatalogConfig};
//!
//! let catalog = Catalog::open(&CatalogConfig::from_env()?).await?;
//!
//! let products = catalog.products();
//! products.add(&Product::new("C1", "Widget", Money::from_cents(1000), 5)).await?;
//! products.debit_stock("C1", 2).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod record;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::Catalog;
pub use config::{CatalogConfig, ConfigError, StoreKind};
pub use document::{
    Document, DocumentCollection, FieldUpdate, Filter, MemoryCollection, SqliteCollection,
};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use record::ProductRecord;

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::SupplierRepository;
