//! # Domain Types
//!
//! Domain entities of the catalog.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐          ┌─────────────────────┐              │
//! │  │      Product        │          │      Supplier       │              │
//! │  │  ─────────────────  │          │  ─────────────────  │              │
//! │  │  code (business)    │          │  id (UUID)          │              │
//! │  │  name               │          │  document_number    │              │
//! │  │  description        │          │  name               │              │
//! │  │  active             │          │  active             │              │
//! │  │  value (Money)      │          └─────────────────────┘              │
//! │  │  stock              │           contract only, no store             │
//! │  └─────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! A product is identified by its business `code`. The document store keeps
//! its own internal identifier on the persisted record; that identifier never
//! leaks into the domain entity.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Business code - stable external key used for every lookup.
    pub code: String,

    /// Display name.
    pub name: String,

    /// Optional longer description.
    pub description: Option<String>,

    /// Whether the product is active (deactivation never deletes).
    pub active: bool,

    /// Monetary value in cents.
    pub value: Money,

    /// Units in stock.
    pub stock: i64,
}

impl Product {
    /// Creates an active product without a description.
    pub fn new(code: impl Into<String>, name: impl Into<String>, value: Money, stock: i64) -> Self {
        Product {
            code: code.into(),
            name: name.into(),
            description: None,
            active: true,
            value,
            stock,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks if `quantity` units can be debited without going negative.
    pub fn can_debit(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier of catalog products.
///
/// Only the entity and its repository contract exist; no store backs it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Supplier {
    #[ts(as = "String")]
    pub id: Uuid,

    /// Tax registration number (CNPJ and the like).
    pub document_number: String,

    pub name: String,

    pub active: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_is_active() {
        let product = Product::new("C1", "Widget", Money::from_cents(1000), 5);
        assert!(product.active);
        assert_eq!(product.description, None);
        assert_eq!(product.stock, 5);
    }

    #[test]
    fn test_with_description() {
        let product =
            Product::new("C1", "Widget", Money::zero(), 0).with_description("A small widget");
        assert_eq!(product.description.as_deref(), Some("A small widget"));
    }

    #[test]
    fn test_can_debit() {
        let product = Product::new("C1", "Widget", Money::zero(), 3);
        assert!(product.can_debit(3));
        assert!(!product.can_debit(4));
    }

    #[test]
    fn test_product_wire_shape() {
        let product = Product::new("C1", "Widget", Money::from_cents(1250), 5);
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["code"], "C1");
        assert_eq!(json["value"], 1250);
        assert_eq!(json["active"], true);
    }
}
