//! # Product Transitions
//!
//! The four state changes a stored product goes through after it is added.
//!
//! ## Delta, Not Snapshot
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  ❌ Caller computes the new entity and overwrites the record:       │
//! │     stock = 7 (read 10 earlier, sold 3)                             │
//! │                                                                     │
//! │  ✅ Caller names the transition, the store applies the delta:       │
//! │     DebitStock(3)  →  stock = stock - 3  (guarded by stock >= 3)    │
//! │                                                                     │
//! │  Two terminals debiting 3 and 2 concurrently end at stock - 5.     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store layer compiles a transition into an atomic field update using
//! [`ProductTransition::active_after`], [`ProductTransition::stock_delta`] and
//! the two stock guards, [`ProductTransition::required_stock`] (debit floor)
//! and [`ProductTransition::max_stock_before`] (restock ceiling). [`ProductTransition::apply`] runs the
//! same rules against an in-memory entity.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Product;
use crate::validation::validate_movement;
use crate::MAX_STOCK;

/// A state transition on a stored product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "amount")]
pub enum ProductTransition {
    /// Sets `active = true`.
    Activate,
    /// Sets `active = false`.
    Deactivate,
    /// Removes units from stock; never below zero.
    DebitStock(i64),
    /// Adds units to stock; never above [`MAX_STOCK`].
    Restock(i64),
}

impl ProductTransition {
    /// Checks the transition's own parameters (movement amounts).
    pub fn validate(&self) -> CoreResult<()> {
        match *self {
            ProductTransition::DebitStock(amount) | ProductTransition::Restock(amount) => {
                validate_movement(amount)?;
            }
            ProductTransition::Activate | ProductTransition::Deactivate => {}
        }
        Ok(())
    }

    /// The value `active` takes afterwards, if the transition touches it.
    pub fn active_after(&self) -> Option<bool> {
        match self {
            ProductTransition::Activate => Some(true),
            ProductTransition::Deactivate => Some(false),
            _ => None,
        }
    }

    /// Signed change applied to `stock` (zero for activation changes).
    pub fn stock_delta(&self) -> i64 {
        match *self {
            ProductTransition::DebitStock(amount) => -amount,
            ProductTransition::Restock(amount) => amount,
            _ => 0,
        }
    }

    /// Minimum stock the product must hold for the transition to succeed.
    pub fn required_stock(&self) -> Option<i64> {
        match *self {
            ProductTransition::DebitStock(amount) => Some(amount),
            _ => None,
        }
    }

    /// Maximum stock the product may hold beforehand for the result to stay
    /// within [`MAX_STOCK`].
    pub fn max_stock_before(&self) -> Option<i64> {
        match *self {
            ProductTransition::Restock(amount) => Some(MAX_STOCK.saturating_sub(amount)),
            _ => None,
        }
    }

    /// Applies the transition to a product in place.
    ///
    /// Leaves the product untouched when it fails.
    pub fn apply(&self, product: &mut Product) -> CoreResult<()> {
        self.validate()?;

        if let Some(required) = self.required_stock() {
            if !product.can_debit(required) {
                return Err(CoreError::InsufficientStock {
                    code: product.code.clone(),
                    available: product.stock,
                    requested: required,
                });
            }
        }

        let stock = product
            .stock
            .checked_add(self.stock_delta())
            .filter(|stock| self.stock_delta() <= 0 || *stock <= MAX_STOCK)
            .ok_or_else(|| CoreError::StockLimitExceeded {
                code: product.code.clone(),
                available: product.stock,
                requested: self.stock_delta(),
                max: MAX_STOCK,
            })?;

        if let Some(active) = self.active_after() {
            product.active = active;
        }
        product.stock = stock;

        Ok(())
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ProductTransition::Activate => "activate",
            ProductTransition::Deactivate => "deactivate",
            ProductTransition::DebitStock(_) => "debit_stock",
            ProductTransition::Restock(_) => "restock",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
