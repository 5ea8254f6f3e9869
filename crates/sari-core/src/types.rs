//! # Domain Types
//!
//! Core domain types used throughout Sari POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │   SaleRecord    │   │  RefundRecord   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  name (unique)  │   │  cashier        │   │  sale_id (FK)   │       │
//! │  │  price_cents    │   │  grand_total    │   │  amount_cents   │       │
//! │  │  stock_count    │   │  line_items[…]  │   │  processed_by   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    LineItem     │   │ PaymentMethod   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  snapshot of a  │   │  Cash           │                             │
//! │  │  cart line at   │   │  Card           │                             │
//! │  │  sale time      │   └─────────────────┘                             │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every durable entity carries an `i64` identifier assigned by the ledger at
//! insert time. The sale id doubles as the transaction number an operator
//! types in when looking up a refund, so it stays short and human-readable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Item
// =============================================================================

/// A catalog item available for sale.
///
/// `stock_count` is mutated by stock-in (manual restock, refund restock) and
/// stock-out (sale) and must never go negative; the persistence layer
/// enforces that with a conditional update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    /// Ledger-assigned identifier.
    pub id: i64,

    /// Display name shown at the register. Unique, case-sensitive.
    pub name: String,

    /// Unit price in centavos. Always positive.
    pub price_cents: i64,

    /// Units currently on the shelf. Never negative.
    pub stock_count: i64,

    /// When the item was created.
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the requested quantity is on the shelf.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock_count >= quantity
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was tendered. Card payments happen on an external terminal;
/// the register only records which method was used.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One line of a sale, frozen at sale time.
///
/// ## Snapshot Pattern
/// Item details (id, name, unit price) are copied into the sale record when
/// the sale commits. The sale history stays correct even if the catalog item
/// is renamed, repriced, or deleted later - and refunds always pay back the
/// sale-time price, never the current one.
///
/// The ordered `Vec<LineItem>` is persisted as a JSON column on the sale row
/// so each line can be refunded independently later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog item this line was rung up against (stable reference for
    /// refund restocking).
    pub item_id: i64,

    /// Item name at time of sale (frozen).
    pub name: String,

    /// Unit price in centavos at time of sale (frozen).
    pub unit_price_cents: i64,

    /// Quantity sold. At least 1.
    pub quantity: i64,

    /// Line total (unit_price × quantity).
    pub line_total_cents: i64,
}

impl LineItem {
    /// Returns the sale-time unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// A durable, completed sale. Immutable after creation; refunds reference it
/// but never modify it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Ledger-assigned transaction id (what the operator types in at the
    /// refund desk).
    pub id: i64,

    /// Identity of the cashier who rang the sale. Authenticated upstream.
    pub cashier: String,

    /// How the sale was tendered.
    pub payment_method: PaymentMethod,

    /// Sum of line totals, before any discount.
    pub subtotal_cents: i64,

    /// Amount actually due, after the concession discount if applied.
    pub grand_total_cents: i64,

    /// Whether the fixed concession discount was applied (exactly once).
    pub discount_applied: bool,

    /// Ordered snapshot of the cart at sale time.
    pub line_items: Vec<LineItem>,

    /// When the sale committed.
    pub created_at: DateTime<Utc>,
}

impl SaleRecord {
    /// Returns the pre-discount subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Returns the grand total as Money.
    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_cents(self.grand_total_cents)
    }
}

// =============================================================================
// Refund Record
// =============================================================================

/// A durable log entry of money/stock returned against a prior sale.
///
/// Append-only; one sale may accumulate several partial refunds. The per-line
/// quantities live in companion `refund_lines` rows keyed by
/// `(sale_id, line_index)` so cumulative refunded quantity can be enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RefundRecord {
    /// Ledger-assigned identifier.
    pub id: i64,

    /// The sale this refund was issued against.
    pub sale_id: i64,

    /// Total amount returned, at sale-time prices.
    pub refund_amount_cents: i64,

    /// Identity of the manager who approved and processed the refund.
    pub processed_by: String,

    /// When the refund committed.
    pub processed_at: DateTime<Utc>,
}

impl RefundRecord {
    /// Returns the refunded amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.refund_amount_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_can_sell() {
        let item = Item {
            id: 1,
            name: "Coke".to_string(),
            price_cents: 2000,
            stock_count: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(item.can_sell(3));
        assert!(!item.can_sell(4));
    }

    #[test]
    fn test_payment_method_serde_roundtrip() {
        let json = serde_json::to_string(&PaymentMethod::Cash).unwrap();
        assert_eq!(json, "\"cash\"");
        let back: PaymentMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PaymentMethod::Cash);
    }

    #[test]
    fn test_line_item_snapshot_roundtrip() {
        // The persisted JSON snapshot must reproduce the lines in order.
        let lines = vec![
            LineItem {
                item_id: 1,
                name: "Coke".to_string(),
                unit_price_cents: 2000,
                quantity: 3,
                line_total_cents: 6000,
            },
            LineItem {
                item_id: 2,
                name: "Chips".to_string(),
                unit_price_cents: 3500,
                quantity: 2,
                line_total_cents: 7000,
            },
        ];

        let json = serde_json::to_string(&lines).unwrap();
        let back: Vec<LineItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lines);

        // Reconstructing line totals reproduces the pre-discount total.
        let subtotal: i64 = back.iter().map(|l| l.line_total_cents).sum();
        assert_eq!(subtotal, 13000);
    }
}
