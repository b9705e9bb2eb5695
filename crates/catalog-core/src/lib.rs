//! # catalog-core: Pure Domain Logic for the Product Catalog
//!
//! This crate holds the catalog's domain entities and rules as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Callers (services, tools, seed)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ catalog-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ transition │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Activate  │  │   rules   │  │   │
//! │  │   │ Supplier  │  │           │  │  Restock   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                catalog-db (Document Store Layer)                │   │
//! │  │        collections, record mapping, product repository          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Product, Supplier)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`transition`] - Product state transitions (activate, debit stock, ...)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::{Money, Product, ProductTransition};
//!
//! let mut widget = Product::new("C1", "Widget", Money::from_major_minor(10, 0), 5);
//!
//! ProductTransition::DebitStock(2).apply(&mut widget).unwrap();
//! assert_eq!(widget.stock, 3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod transition;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use transition::ProductTransition;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product business code.
pub const MAX_CODE_LEN: usize = 64;

/// Maximum length of a product or supplier name.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum stock a product may hold.
///
/// Keeps `stock + movement` far from `i64` overflow on every backend.
pub const MAX_STOCK: i64 = 1_000_000_000_000;

/// Maximum quantity moved by a single stock transition.
///
/// ## Business Reason
/// Catches typos like 10000 instead of 100 before they reach the store.
pub const MAX_STOCK_MOVEMENT: i64 = 1_000_000;
