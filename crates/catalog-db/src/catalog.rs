//! # Catalog Handle
//!
//! Opens the configured document store and hands out repositories.
//!
//! ```text
//! CatalogConfig::from_env()
//!       │
//!       ▼
//! Catalog::open(&config)
//!       ├── StoreKind::Memory ──► MemoryCollection<ProductRecord>
//!       └── StoreKind::Sqlite ──► Database (pool + migrations)
//!       │
//!       ▼
//! catalog.products() ──► ProductRepository
//! ```

use std::sync::Arc;

use tracing::info;

use crate::config::{CatalogConfig, StoreKind};
use crate::document::MemoryCollection;
use crate::error::DbResult;
use crate::pool::Database;
use crate::record::ProductRecord;
use crate::repository::product::ProductRepository;

/// An open catalog store.
///
/// Cloning shares the underlying store.
#[derive(Debug, Clone)]
pub enum Catalog {
    Memory(MemoryCollection<ProductRecord>),
    Sqlite(Database),
}

impl Catalog {
    /// Opens the backend named by `config`.
    pub async fn open(config: &CatalogConfig) -> DbResult<Self> {
        info!(store = %config.store, "Opening catalog");

        match config.store {
            StoreKind::Memory => Ok(Catalog::in_memory()),
            StoreKind::Sqlite => Ok(Catalog::Sqlite(Database::new(config.db_config()).await?)),
        }
    }

    /// A fresh, empty process-local catalog.
    pub fn in_memory() -> Self {
        Catalog::Memory(MemoryCollection::new())
    }

    pub fn store_kind(&self) -> StoreKind {
        match self {
            Catalog::Memory(_) => StoreKind::Memory,
            Catalog::Sqlite(_) => StoreKind::Sqlite,
        }
    }

    /// Product repository over this catalog's store.
    pub fn products(&self) -> ProductRepository {
        match self {
            Catalog::Memory(products) => ProductRepository::new(Arc::new(products.clone())),
            Catalog::Sqlite(db) => db.products(),
        }
    }

    /// Releases store resources. A no-op for the memory store.
    pub async fn close(&self) {
        if let Catalog::Sqlite(db) = self {
            db.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{Money, Product};

    #[tokio::test]
    async fn test_memory_repositories_share_store() {
        let catalog = Catalog::open(&CatalogConfig::default()).await.unwrap();
        assert_eq!(catalog.store_kind(), StoreKind::Memory);

        catalog
            .products()
            .add(&Product::new("C1", "Widget", Money::from_cents(1000), 5))
            .await
            .unwrap();

        assert_eq!(catalog.products().count().await.unwrap(), 1);
        assert_eq!(catalog.clone().products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_open_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig {
            store: StoreKind::Sqlite,
            db_path: dir.path().join("catalog.db"),
            max_connections: 2,
            ..CatalogConfig::default()
        };

        let catalog = Catalog::open(&config).await.unwrap();
        assert_eq!(catalog.store_kind(), StoreKind::Sqlite);
        catalog
            .products()
            .add(&Product::new("C1", "Widget", Money::from_cents(1000), 5))
            .await
            .unwrap();
        catalog.close().await;

        let reopened = Catalog::open(&config).await.unwrap();
        let widget = reopened.products().get_by_code("C1").await.unwrap();
        assert_eq!(widget.map(|p| p.name), Some("Widget".to_string()));
        reopened.close().await;
    }
}
