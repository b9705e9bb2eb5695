//! # Record Mapping
//!
//! Persisted record shapes and their field-by-field conversion to and from
//! domain entities.
//!
//! ```text
//! ┌──────────────────────┐     From<&Product>      ┌──────────────────────┐
//! │  Product (domain)    │ ──────────────────────► │  ProductRecord       │
//! │  code, name, ...     │                         │  _id: None           │
//! │                      │ ◄────────────────────── │  code, name, ...     │
//! └──────────────────────┘   From<ProductRecord>   │  created_at          │
//!                                                  └──────────────────────┘
//! ```
//!
//! `_id` and `created_at` exist only on the record. Mapping an entity never
//! invents an internal identifier; the store assigns one on insert and the
//! repository copies it across replaces.

use catalog_core::{Money, Product};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{Document, ID_FIELD};

/// Persisted form of a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Internal identifier assigned by the store.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub value: Money,
    pub stock: i64,

    /// When the record was first written. Not part of the domain entity.
    pub created_at: DateTime<Utc>,
}

impl ProductRecord {
    pub const ID: &'static str = ID_FIELD;
    pub const CODE: &'static str = "code";
    pub const NAME: &'static str = "name";
    pub const ACTIVE: &'static str = "active";
    pub const VALUE: &'static str = "value";
    pub const STOCK: &'static str = "stock";

    /// Copies the five mutable fields from `product` onto this record.
    ///
    /// The internal identifier, business code and `created_at` are kept.
    pub fn overwrite_from(&mut self, product: &Product) {
        self.name = product.name.clone();
        self.description = product.description.clone();
        self.active = product.active;
        self.value = product.value;
        self.stock = product.stock;
    }
}

impl Document for ProductRecord {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        ProductRecord {
            id: None,
            code: product.code.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            active: product.active,
            value: product.value,
            stock: product.stock,
            created_at: Utc::now(),
        }
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Product {
            code: record.code,
            name: record.name,
            description: record.description,
            active: record.active,
            value: record.value,
            stock: record.stock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Product {
        Product::new("C1", "Widget", Money::from_cents(1000), 5).with_description("Blue")
    }

    #[test]
    fn test_entity_to_record_has_no_id() {
        let record = ProductRecord::from(&widget());
        assert_eq!(record.id, None);
        assert_eq!(record.code, "C1");
        assert_eq!(record.description.as_deref(), Some("Blue"));
    }

    #[test]
    fn test_mapping_is_lossless() {
        let product = widget();
        let back = Product::from(ProductRecord::from(&product));
        assert_eq!(back, product);
    }

    #[test]
    fn test_overwrite_keeps_identity() {
        let mut record = ProductRecord::from(&widget());
        record.id = Some("internal-1".to_string());
        let created_at = record.created_at;

        let mut changed = widget();
        changed.code = "OTHER".to_string();
        changed.name = "Gadget".to_string();
        changed.description = None;
        changed.active = false;
        changed.value = Money::from_cents(1250);
        changed.stock = 9;
        record.overwrite_from(&changed);

        assert_eq!(record.id.as_deref(), Some("internal-1"));
        assert_eq!(record.code, "C1");
        assert_eq!(record.created_at, created_at);
        assert_eq!(record.name, "Gadget");
        assert_eq!(record.description, None);
        assert!(!record.active);
        assert_eq!(record.value.cents(), 1250);
        assert_eq!(record.stock, 9);
    }

    #[test]
    fn test_record_wire_shape() {
        let mut record = ProductRecord::from(&widget());
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get(ProductRecord::ID).is_none());

        record.id = Some("internal-1".to_string());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json[ProductRecord::ID], "internal-1");
        assert_eq!(json[ProductRecord::VALUE], 1000);
        assert_eq!(json[ProductRecord::STOCK], 5);
    }
}
