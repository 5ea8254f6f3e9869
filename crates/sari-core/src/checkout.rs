//! # Checkout Settlement Math
//!
//! The pure half of checkout: given a cart, a tender, and the discount flag,
//! decide what is due, whether the tender covers it, and how much change to
//! hand back. The db crate's `CheckoutService` runs this first and only then
//! opens a transaction.
//!
//! ## Settlement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Settlement                                │
//! │                                                                         │
//! │  Cart ──► subtotal = Σ line totals                                     │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  discount flag set? ── yes ──► grand_total = subtotal × 80% (once)     │
//! │                │                                                        │
//! │                no ───────────► grand_total = subtotal                  │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  Tender::Cash{tendered} ──► tendered < grand_total?                    │
//! │                │                  │                                     │
//! │                │                  └─► InsufficientPayment{shortfall}    │
//! │                │                                                        │
//! │                └──► change = tendered − grand_total (never persisted)  │
//! │                                                                         │
//! │  Tender::Card ──► always covers; change = 0                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::PaymentMethod;

// =============================================================================
// Tender
// =============================================================================

/// What the customer hands over at the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Tender {
    /// Physical cash; the tendered amount must cover the grand total.
    Cash { tendered_cents: i64 },
    /// Card on the external terminal; the terminal guarantees coverage.
    Card,
}

impl Tender {
    /// The payment method recorded on the sale.
    pub fn method(&self) -> PaymentMethod {
        match self {
            Tender::Cash { .. } => PaymentMethod::Cash,
            Tender::Card => PaymentMethod::Card,
        }
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// The outcome of the pure settlement pass: amounts the commit step persists
/// and the change figure the register displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Sum of line totals, before discount.
    pub subtotal: Money,

    /// Amount due after the concession discount, if applied.
    pub grand_total: Money,

    /// Whether the fixed concession discount was applied.
    pub discount_applied: bool,

    /// Change due back to the customer. Displayed, never persisted.
    pub change: Money,
}

/// Settles a cart against a tender.
///
/// ## Protocol
/// 1. `EmptyCart` if the cart has no lines (before anything else).
/// 2. Apply the fixed concession discount exactly once if flagged.
/// 3. Cash must cover the grand total, else `InsufficientPayment` with the
///    shortfall; change is the excess.
///
/// Stock verification is deliberately NOT here: it belongs to the commit
/// transaction, where the decrement and the check are one atomic statement.
///
/// ## Example
/// ```rust
/// use sari_core::cart::Cart;
/// use sari_core::checkout::{settle, Tender};
/// # use sari_core::types::Item;
/// # use chrono::Utc;
/// # let coke = Item { id: 1, name: "Coke".into(), price_cents: 2000,
/// #     stock_count: 10, created_at: Utc::now(), updated_at: Utc::now() };
///
/// let mut cart = Cart::new();
/// cart.add_line(&coke, 3).unwrap();
///
/// let s = settle(&cart, Tender::Cash { tendered_cents: 10000 }, false).unwrap();
/// assert_eq!(s.grand_total.cents(), 6000);
/// assert_eq!(s.change.cents(), 4000);
/// ```
pub fn settle(cart: &Cart, tender: Tender, apply_discount: bool) -> CoreResult<Settlement> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let subtotal = cart.subtotal();
    let grand_total = if apply_discount {
        subtotal.apply_concession_discount()
    } else {
        subtotal
    };

    let change = match tender {
        Tender::Cash { tendered_cents } => {
            let tendered = Money::from_cents(tendered_cents);
            if tendered < grand_total {
                return Err(CoreError::InsufficientPayment {
                    shortfall_cents: (grand_total - tendered).cents(),
                });
            }
            tendered - grand_total
        }
        Tender::Card => Money::zero(),
    };

    Ok(Settlement {
        subtotal,
        grand_total,
        discount_applied: apply_discount,
        change,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Item;
    use chrono::Utc;

    fn item(id: i64, name: &str, price_cents: i64) -> Item {
        Item {
            id,
            name: name.to_string(),
            price_cents,
            stock_count: 50,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// The canonical cart: 3 × Coke ₱20 + 2 × Chips ₱35 = ₱130.
    fn scenario_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_line(&item(1, "Coke", 2000), 3).unwrap();
        cart.add_line(&item(2, "Chips", 3500), 2).unwrap();
        cart
    }

    #[test]
    fn test_cash_sale_with_change() {
        let cart = scenario_cart();
        let s = settle(&cart, Tender::Cash { tendered_cents: 15000 }, false).unwrap();

        assert_eq!(s.subtotal.cents(), 13000);
        assert_eq!(s.grand_total.cents(), 13000);
        assert_eq!(s.change.cents(), 2000);
        assert!(!s.discount_applied);
    }

    #[test]
    fn test_discount_applied_exactly_once() {
        let cart = scenario_cart();
        let s = settle(&cart, Tender::Card, true).unwrap();

        // round(130.00 × 0.8, 2) = 104.00
        assert_eq!(s.grand_total.cents(), 10400);
        assert!(s.discount_applied);
        // Subtotal is preserved pre-discount for the ledger
        assert_eq!(s.subtotal.cents(), 13000);
    }

    #[test]
    fn test_insufficient_cash_reports_shortfall() {
        let cart = scenario_cart();
        let err = settle(&cart, Tender::Cash { tendered_cents: 10000 }, false).unwrap_err();

        match err {
            CoreError::InsufficientPayment { shortfall_cents } => {
                assert_eq!(shortfall_cents, 3000)
            }
            other => panic!("expected InsufficientPayment, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_cash_gives_zero_change() {
        let cart = scenario_cart();
        let s = settle(&cart, Tender::Cash { tendered_cents: 13000 }, false).unwrap();
        assert!(s.change.is_zero());
    }

    #[test]
    fn test_card_never_short() {
        let cart = scenario_cart();
        let s = settle(&cart, Tender::Card, false).unwrap();
        assert_eq!(s.grand_total.cents(), 13000);
        assert!(s.change.is_zero());
    }

    #[test]
    fn test_empty_cart_rejected_first() {
        let cart = Cart::new();
        // Even a nonsense tender never gets looked at for an empty cart
        let err = settle(&cart, Tender::Cash { tendered_cents: -1 }, true).unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
    }

    #[test]
    fn test_discounted_cash_shortfall_uses_discounted_total() {
        let cart = scenario_cart();
        // ₱104.00 due after discount; ₱104.00 tendered covers it
        let s = settle(&cart, Tender::Cash { tendered_cents: 10400 }, true).unwrap();
        assert!(s.change.is_zero());

        // ₱103.99 does not
        let err = settle(&cart, Tender::Cash { tendered_cents: 10399 }, true).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientPayment { shortfall_cents: 1 }
        ));
    }
}
