//! # Cart
//!
//! The cashier's transient working cart: the unsaved set of lines assembled
//! before checkout. Discarded on completion or cancellation - nothing here is
//! durable.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Operations                                   │
//! │                                                                         │
//! │  Register Action            Cart Change                                │
//! │  ───────────────            ───────────                                │
//! │                                                                         │
//! │  Pick item + qty ─────────► add_line()       merge or push line        │
//! │                                                                         │
//! │  "-1" button ─────────────► reduce_quantity() decrement, drop at zero  │
//! │                                                                         │
//! │  "✖" button ──────────────► remove_line()     drop the line            │
//! │                                                                         │
//! │  Clear / sale committed ──► clear()           empty the cart           │
//! │                                                                         │
//! │  Quantity floor is 1 per add: zero-quantity lines never enter the cart.│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Item, LineItem};
use crate::validation::validate_quantity;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One line of the working cart.
///
/// ## Price Freezing
/// The unit price is captured when the line is added. If the catalog price
/// changes before checkout, the cart keeps the price the customer saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog item id (for the stock decrement at checkout).
    pub item_id: i64,

    /// Item name at time of adding (frozen).
    pub name: String,

    /// Unit price in centavos at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in the cart. At least 1.
    pub quantity: i64,
}

impl CartLine {
    /// Creates a cart line from a catalog item and quantity.
    pub fn from_item(item: &Item, quantity: i64) -> Self {
        CartLine {
            item_id: item.id,
            name: item.name.clone(),
            unit_price_cents: item.price_cents,
            quantity,
        }
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents())
    }

    /// Freezes this line into the persisted sale snapshot form.
    pub fn to_line_item(&self) -> LineItem {
        LineItem {
            item_id: self.item_id,
            name: self.name.clone(),
            unit_price_cents: self.unit_price_cents,
            quantity: self.quantity,
            line_total_cents: self.line_total_cents(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The working cart.
///
/// ## Invariants
/// - Lines are unique by `item_id` (adding the same item merges quantities)
/// - Quantity is always >= 1 (reducing to 0 removes the line)
/// - Maximum lines: [`MAX_CART_LINES`]
/// - Maximum quantity per line: [`MAX_LINE_QUANTITY`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds an item to the cart or increases quantity if already present.
    pub fn add_line(&mut self, item: &Item, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        // Merge with an existing line for the same item
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item.id) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine::from_item(item, quantity));
        Ok(())
    }

    /// Reduces a line's quantity by one; the line is removed when the
    /// quantity would hit zero.
    pub fn reduce_quantity(&mut self, item_id: i64) {
        if let Some(idx) = self.lines.iter().position(|l| l.item_id == item_id) {
            if self.lines[idx].quantity > 1 {
                self.lines[idx].quantity -= 1;
            } else {
                self.lines.remove(idx);
            }
        }
    }

    /// Removes a line from the cart by item id.
    pub fn remove_line(&mut self, item_id: i64) {
        self.lines.retain(|l| l.item_id != item_id);
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines currently in the cart, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns the number of distinct lines in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Calculates the cart subtotal (sum of line totals).
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Freezes the cart into the ordered snapshot persisted with the sale.
    pub fn to_line_items(&self) -> Vec<LineItem> {
        self.lines.iter().map(CartLine::to_line_item).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_item(id: i64, name: &str, price_cents: i64) -> Item {
        Item {
            id,
            name: name.to_string(),
            price_cents,
            stock_count: 50,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_cart_add_line() {
        let mut cart = Cart::new();
        let coke = test_item(1, "Coke", 2000);

        cart.add_line(&coke, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.subtotal().cents(), 6000);
    }

    #[test]
    fn test_cart_add_same_item_merges_quantity() {
        let mut cart = Cart::new();
        let coke = test_item(1, "Coke", 2000);

        cart.add_line(&coke, 2).unwrap();
        cart.add_line(&coke, 3).unwrap();

        assert_eq!(cart.line_count(), 1); // Still one line
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_cart_rejects_zero_quantity() {
        let mut cart = Cart::new();
        let coke = test_item(1, "Coke", 2000);

        assert!(cart.add_line(&coke, 0).is_err());
        assert!(cart.add_line(&coke, -2).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_reduce_quantity_drops_at_zero() {
        let mut cart = Cart::new();
        let coke = test_item(1, "Coke", 2000);

        cart.add_line(&coke, 2).unwrap();
        cart.reduce_quantity(1);
        assert_eq!(cart.total_quantity(), 1);

        cart.reduce_quantity(1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_price_frozen_at_add_time() {
        let mut cart = Cart::new();
        let mut coke = test_item(1, "Coke", 2000);

        cart.add_line(&coke, 1).unwrap();

        // Catalog price changes after the line was added
        coke.price_cents = 9999;

        assert_eq!(cart.lines()[0].unit_price_cents, 2000);
    }

    #[test]
    fn test_cart_snapshot_preserves_order_and_totals() {
        let mut cart = Cart::new();
        cart.add_line(&test_item(1, "Coke", 2000), 3).unwrap();
        cart.add_line(&test_item(2, "Chips", 3500), 2).unwrap();

        let snapshot = cart.to_line_items();
        assert_eq!(snapshot[0].name, "Coke");
        assert_eq!(snapshot[0].line_total_cents, 6000);
        assert_eq!(snapshot[1].name, "Chips");
        assert_eq!(snapshot[1].line_total_cents, 7000);

        let subtotal: i64 = snapshot.iter().map(|l| l.line_total_cents).sum();
        assert_eq!(subtotal, cart.subtotal().cents());
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        cart.add_line(&test_item(1, "Coke", 2000), 2).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
    }
}
