//! # Product Repository
//!
//! Catalog operations for products over any [`DocumentCollection`].
//!
//! ## Key Operations
//! - Add / full update (lookup-then-replace)
//! - Transitions: activate, deactivate, debit stock, restock (atomic)
//! - Value change (atomic)
//! - Lookups by code, by name substring, all
//!
//! ## Update Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update(&Product)                 two round-trips, NOT isolated         │
//! │                                                                         │
//! │    filter_by(code == C1) ──► existing record (_id = X)                 │
//! │    copy name/description/active/value/stock onto it                     │
//! │    replace_one(record with _id = X)                                     │
//! │                                                                         │
//! │    A write landing between the two calls is lost.                       │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  apply_transition / update_value  one atomic store call                 │
//! │                                                                         │
//! │    update_one(code == C1 [&& stock >= n], [Set/Inc ...])                │
//! │    matched == 0  →  look once more to report NotFound or the rule      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use catalog_core::validation::{validate_product, validate_product_code, validate_value};
use catalog_core::{CoreError, Money, Product, ProductTransition, MAX_STOCK};
use tracing::debug;

use crate::document::{DocumentCollection, FieldUpdate, Filter};
use crate::error::{DbError, DbResult};
use crate::record::ProductRecord;

const ENTITY: &str = "Product";

/// Repository for product operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = catalog.products();
///
/// repo.add(&Product::new("C1", "Widget", Money::from_cents(1000), 5)).await?;
/// repo.update_value("C1", Money::from_cents(1250)).await?;
/// let widget = repo.get_by_code("C1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    collection: Arc<dyn DocumentCollection<ProductRecord>>,
}

impl ProductRepository {
    /// Creates a repository over a product collection.
    pub fn new(collection: Arc<dyn DocumentCollection<ProductRecord>>) -> Self {
        ProductRepository { collection }
    }

    fn by_code(code: &str) -> Filter {
        Filter::eq(ProductRecord::CODE, code)
    }

    /// Adds a new product.
    ///
    /// ## Returns
    /// * `Ok(())` - Product stored under a fresh internal identifier
    /// * `Err(DbError::Domain)` - Product failed validation
    pub async fn add(&self, product: &Product) -> DbResult<()> {
        debug!(code = %product.code, "Adding product");

        validate_product(product)?;
        self.collection
            .insert_one(ProductRecord::from(product))
            .await?;

        Ok(())
    }

    /// Overwrites name, description, active, value and stock of an existing
    /// product, found by its business code.
    ///
    /// ## Known Limitation
    /// Lookup and replace are separate store calls with no isolation; a
    /// concurrent write between them is lost.
    ///
    /// ## Returns
    /// * `Ok(())` - Record replaced, internal identifier preserved
    /// * `Err(DbError::NotFound)` - No product with this code
    ///
    /// The not-found message is English, `"Product not found: <code>"`. Match
    /// on [`DbError::is_not_found`] or the `id` field rather than the text.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(code = %product.code, "Updating product");

        validate_product(product)?;

        let mut existing = self
            .collection
            .find_one(&Self::by_code(&product.code))
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, &product.code))?;

        existing.overwrite_from(product);

        self.collection.replace_one(&existing).await
    }

    /// Applies a state transition to the product with the given code.
    ///
    /// The transition is compiled into a single atomic field update. A debit
    /// carries a `stock >= amount` guard, so stock never goes negative.
    ///
    /// ## Returns
    /// * `Ok(())` - Transition applied
    /// * `Err(DbError::NotFound)` - No product with this code
    /// * `Err(DbError::Domain(InsufficientStock))` - Debit exceeds stock
    /// * `Err(DbError::Domain(StockLimitExceeded))` - Restock would pass `MAX_STOCK`
    pub async fn apply_transition(&self, code: &str, transition: ProductTransition) -> DbResult<()> {
        debug!(code = %code, transition = transition.name(), "Applying product transition");

        validate_product_code(code)?;
        transition.validate()?;

        let mut filter = Self::by_code(code);
        if let Some(required) = transition.required_stock() {
            filter = filter.and(Filter::Gte(ProductRecord::STOCK, required));
        }
        if let Some(ceiling) = transition.max_stock_before() {
            filter = filter.and(Filter::Lte(ProductRecord::STOCK, ceiling));
        }

        let mut updates = Vec::with_capacity(2);
        if let Some(active) = transition.active_after() {
            updates.push(FieldUpdate::set(ProductRecord::ACTIVE, active));
        }
        if transition.stock_delta() != 0 {
            updates.push(FieldUpdate::Inc(ProductRecord::STOCK, transition.stock_delta()));
        }

        if self.collection.update_one(&filter, &updates).await? == 1 {
            return Ok(());
        }

        // Nothing matched: either the code is unknown or the guard refused.
        let current = self
            .collection
            .find_one(&Self::by_code(code))
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, code))?;

        let available = current.stock;
        let mut product = Product::from(current);
        if let Err(err) = transition.apply(&mut product) {
            return Err(err.into());
        }

        // Guard passed on re-read: stock moved between the two calls.
        if let Some(requested) = transition.required_stock() {
            return Err(DbError::Domain(CoreError::InsufficientStock {
                code: code.to_string(),
                available,
                requested,
            }));
        }
        if transition.max_stock_before().is_some() {
            return Err(DbError::Domain(CoreError::StockLimitExceeded {
                code: code.to_string(),
                available,
                requested: transition.stock_delta(),
                max: MAX_STOCK,
            }));
        }
        Err(DbError::not_found(ENTITY, code))
    }

    /// Marks the product active.
    pub async fn activate(&self, code: &str) -> DbResult<()> {
        self.apply_transition(code, ProductTransition::Activate).await
    }

    /// Marks the product inactive. The record is kept.
    pub async fn deactivate(&self, code: &str) -> DbResult<()> {
        self.apply_transition(code, ProductTransition::Deactivate).await
    }

    /// Removes `amount` units from stock.
    pub async fn debit_stock(&self, code: &str, amount: i64) -> DbResult<()> {
        self.apply_transition(code, ProductTransition::DebitStock(amount))
            .await
    }

    /// Adds `amount` units to stock.
    pub async fn restock(&self, code: &str, amount: i64) -> DbResult<()> {
        self.apply_transition(code, ProductTransition::Restock(amount))
            .await
    }

    /// Changes only the value of the product with the given code.
    ///
    /// ## Returns
    /// * `Ok(())` - Value updated; every other field untouched
    /// * `Err(DbError::NotFound)` - No product with this code
    pub async fn update_value(&self, code: &str, value: Money) -> DbResult<()> {
        debug!(code = %code, value = %value, "Updating product value");

        validate_product_code(code)?;
        validate_value(value)?;

        let matched = self
            .collection
            .update_one(
                &Self::by_code(code),
                &[FieldUpdate::set(ProductRecord::VALUE, value.cents())],
            )
            .await?;

        if matched == 0 {
            return Err(DbError::not_found(ENTITY, code));
        }

        Ok(())
    }

    /// Gets a product by its business code.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - First matching product
    /// * `Ok(None)` - No product with this code
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        debug!(code = %code, "Getting product by code");

        let record = self.collection.find_one(&Self::by_code(code)).await?;

        Ok(record.map(Product::from))
    }

    /// Gets every product whose name contains `fragment` (case-sensitive).
    ///
    /// An empty result is success, never an error.
    pub async fn get_by_name(&self, fragment: &str) -> DbResult<Vec<Product>> {
        debug!(fragment = %fragment, "Getting products by name");

        let records = self
            .collection
            .filter_by(&Filter::contains(ProductRecord::NAME, fragment))
            .await?;

        debug!(count = records.len(), "Name lookup returned products");
        Ok(records.into_iter().map(Product::from).collect())
    }

    /// Gets every product.
    pub async fn get_all(&self) -> DbResult<Vec<Product>> {
        let records = self.collection.filter_by(&Filter::All).await?;

        Ok(records.into_iter().map(Product::from).collect())
    }

    /// Gets products by category.
    ///
    /// Category semantics (exact match or hierarchy) are undefined, so this
    /// always fails with `NotImplemented`.
    pub async fn get_by_category(&self, category: i32) -> DbResult<Vec<Product>> {
        debug!(category = category, "Category lookup requested");

        Err(DbError::NotImplemented(format!(
            "get_by_category({})",
            category
        )))
    }

    /// Counts stored products (for diagnostics).
    pub async fn count(&self) -> DbResult<usize> {
        Ok(self.collection.filter_by(&Filter::All).await?.len())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryCollection;
    use catalog_core::ValidationError;

    fn repo() -> (ProductRepository, MemoryCollection<ProductRecord>) {
        let collection = MemoryCollection::new();
        let repo = ProductRepository::new(Arc::new(collection.clone()));
        (repo, collection)
    }

    fn widget() -> Product {
        Product::new("C1", "Widget", Money::from_major_minor(10, 0), 5)
    }

    async fn record(collection: &MemoryCollection<ProductRecord>, code: &str) -> ProductRecord {
        collection
            .find_one(&Filter::eq(ProductRecord::CODE, code))
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_product() {
        let (repo, collection) = repo();
        let mut bad = widget();
        bad.code = String::new();

        let err = repo.add(&bad).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(collection.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_preserves_identity_and_created_at() {
        let (repo, collection) = repo();
        repo.add(&widget()).await.unwrap();
        let before = record(&collection, "C1").await;

        let mut changed = widget().with_description("Now in blue");
        changed.name = "Blue Widget".to_string();
        changed.active = false;
        changed.value = Money::from_cents(999);
        changed.stock = 42;
        repo.update(&changed).await.unwrap();

        let after = record(&collection, "C1").await;
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(Product::from(after), changed);
        assert_eq!(collection.len().await, 1);
    }

    #[tokio::test]
    async fn test_transition_on_unknown_code_is_not_found() {
        let (repo, _) = repo();

        for result in [
            repo.activate("NOPE").await,
            repo.deactivate("NOPE").await,
            repo.debit_stock("NOPE", 1).await,
            repo.restock("NOPE", 1).await,
            repo.update_value("NOPE", Money::zero()).await,
        ] {
            assert!(result.unwrap_err().is_not_found());
        }
    }

    #[tokio::test]
    async fn test_debit_guard_reports_insufficient_stock() {
        let (repo, collection) = repo();
        repo.add(&widget()).await.unwrap();

        let err = repo.debit_stock("C1", 6).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            })
        ));
        assert_eq!(record(&collection, "C1").await.stock, 5);
    }

    #[tokio::test]
    async fn test_restock_guard_reports_stock_limit() {
        let (repo, collection) = repo();
        repo.add(&Product::new("C1", "Widget", Money::from_cents(100), MAX_STOCK))
            .await
            .unwrap();

        let err = repo.restock("C1", 1).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::StockLimitExceeded { available, requested: 1, .. })
                if available == MAX_STOCK
        ));
        assert_eq!(record(&collection, "C1").await.stock, MAX_STOCK);

        repo.debit_stock("C1", 1).await.unwrap();
        repo.restock("C1", 1).await.unwrap();
        assert_eq!(record(&collection, "C1").await.stock, MAX_STOCK);
    }

    #[tokio::test]
    async fn test_transition_amount_validated_before_store() {
        let (repo, _) = repo();
        repo.add(&widget()).await.unwrap();

        let err = repo.restock("C1", 0).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_negative_value_rejected() {
        let (repo, collection) = repo();
        repo.add(&widget()).await.unwrap();

        assert!(repo
            .update_value("C1", Money::from_cents(-1))
            .await
            .is_err());
        assert_eq!(record(&collection, "C1").await.value.cents(), 1000);
    }

    #[tokio::test]
    async fn test_get_by_category_not_implemented() {
        let (repo, _) = repo();
        repo.add(&widget()).await.unwrap();

        for category in [0, 1, -7] {
            assert!(matches!(
                repo.get_by_category(category).await,
                Err(DbError::NotImplemented(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_find_first_on_duplicate_codes() {
        let (repo, _) = repo();
        repo.add(&widget()).await.unwrap();
        let mut twin = widget();
        twin.name = "Second Widget".to_string();
        repo.add(&twin).await.unwrap();

        let found = repo.get_by_code("C1").await.unwrap().unwrap();
        assert_eq!(found.name, "Widget");
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
