//! # Checkout Service
//!
//! Turns a settled cart into a committed sale: one SQLite transaction that
//! decrements stock and appends the ledger row together.
//!
//! ## Commit Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CheckoutService::commit                          │
//! │                                                                         │
//! │  1. validate cashier, settle cart (pure, sari-core)                    │
//! │         │  EmptyCart / InsufficientPayment stop here, no tx opened      │
//! │         ▼                                                               │
//! │  2. BEGIN                                                               │
//! │  3. per cart line:                                                      │
//! │        UPDATE items SET stock_count = stock_count - qty                 │
//! │        WHERE id = ? AND stock_count >= qty                              │
//! │             │                                                           │
//! │             └─ 0 rows ──► ROLLBACK, InsufficientStock{name, available}  │
//! │  4. INSERT sale (cashier, totals, discount flag, JSON line snapshot)    │
//! │  5. COMMIT ──► Receipt{sale_id, change, ...}                            │
//! │                                                                         │
//! │  The whole of 2-5 runs under the pool's op timeout; on expiry the       │
//! │  transaction is dropped (implicit rollback) and Timeout is returned.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional WHERE clause is the stock invariant: two registers racing
//! over the last unit resolve at the database, not in application reads.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{info, warn};

use sari_core::cart::Cart;
use sari_core::checkout::{settle, Tender};
use sari_core::error::CoreError;
use sari_core::types::{LineItem, PaymentMethod};
use sari_core::validation::validate_actor;
use sari_core::Money;

use crate::error::DbError;
use crate::repository::item::ItemRepository;
use crate::repository::sale::SaleRepository;
use crate::service::ServiceResult;

// =============================================================================
// Receipt
// =============================================================================

/// What the register shows after a successful checkout.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    /// Ledger-assigned transaction number (quoted on refunds).
    pub sale_id: i64,

    /// Pre-discount subtotal, in centavos.
    pub subtotal_cents: i64,

    /// Amount charged, in centavos.
    pub grand_total_cents: i64,

    /// Whether the concession discount was applied.
    pub discount_applied: bool,

    /// How the sale was paid.
    pub payment_method: PaymentMethod,

    /// Change due back. Display-only; never stored on the sale.
    pub change_cents: i64,

    /// The frozen cart lines as recorded on the ledger.
    pub lines: Vec<LineItem>,
}

impl Receipt {
    /// Change due as Money, for display formatting.
    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }
}

// =============================================================================
// Checkout Service
// =============================================================================

/// Transactional checkout commit.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    pool: SqlitePool,
    op_timeout: Duration,
}

impl CheckoutService {
    /// Creates a new checkout service.
    pub fn new(pool: SqlitePool, op_timeout: Duration) -> Self {
        CheckoutService { pool, op_timeout }
    }

    /// Commits a sale: settles the cart, then atomically decrements stock
    /// and appends the ledger row.
    ///
    /// ## Errors
    /// - `ServiceError::Core(EmptyCart)` for an empty cart
    /// - `ServiceError::Core(InsufficientPayment)` when cash is short
    /// - `ServiceError::Core(InsufficientStock)` when any line oversells;
    ///   nothing is persisted and no other line's stock moves
    /// - `ServiceError::Db(Timeout)` when the commit exceeds the op timeout
    pub async fn commit(
        &self,
        cart: &Cart,
        cashier: &str,
        tender: Tender,
        apply_discount: bool,
    ) -> ServiceResult<Receipt> {
        validate_actor(cashier).map_err(CoreError::from)?;

        // Pure settlement first; payment problems never open a transaction
        let settlement = settle(cart, tender, apply_discount)?;
        let lines = cart.to_line_items();

        let work = self.commit_tx(cashier, tender.method(), &settlement, &lines);
        let sale_id = match tokio::time::timeout(self.op_timeout, work).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(cashier, "Checkout commit timed out, transaction dropped");
                return Err(DbError::Timeout(self.op_timeout).into());
            }
        };

        info!(
            sale_id,
            cashier,
            grand_total_cents = settlement.grand_total.cents(),
            discount_applied = settlement.discount_applied,
            method = %tender.method(),
            "Sale committed"
        );

        Ok(Receipt {
            sale_id,
            subtotal_cents: settlement.subtotal.cents(),
            grand_total_cents: settlement.grand_total.cents(),
            discount_applied: settlement.discount_applied,
            payment_method: tender.method(),
            change_cents: settlement.change.cents(),
            lines,
        })
    }

    /// The transactional body: stock decrements + ledger insert.
    async fn commit_tx(
        &self,
        cashier: &str,
        method: PaymentMethod,
        settlement: &sari_core::checkout::Settlement,
        lines: &[LineItem],
    ) -> ServiceResult<i64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        for line in lines {
            let decremented =
                ItemRepository::adjust_stock(&mut *tx, line.item_id, -line.quantity).await?;

            if !decremented {
                // Item is either short or gone from the catalog; report what
                // is actually available. Rolling back via drop.
                let available = sqlx::query_scalar::<_, i64>(
                    "SELECT stock_count FROM items WHERE id = ?1",
                )
                .bind(line.item_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(DbError::from)?
                .unwrap_or(0);

                return Err(CoreError::InsufficientStock {
                    name: line.name.clone(),
                    available,
                    requested: line.quantity,
                }
                .into());
            }
        }

        let sale_id = SaleRepository::insert(
            &mut *tx,
            cashier,
            method,
            settlement.subtotal.cents(),
            settlement.grand_total.cents(),
            settlement.discount_applied,
            lines,
            Utc::now(),
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(sale_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::service::ServiceError;
    use sari_core::types::Item;

    async fn seeded_db() -> (Database, Item, Item) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let coke = db.items().create("Coke", 2000, 10).await.unwrap();
        let chips = db.items().create("Chips", 3500, 2).await.unwrap();
        (db, coke, chips)
    }

    /// 3 × Coke ₱20 + 2 × Chips ₱35 = ₱130
    fn scenario_cart(coke: &Item, chips: &Item) -> Cart {
        let mut cart = Cart::new();
        cart.add_line(coke, 3).unwrap();
        cart.add_line(chips, 2).unwrap();
        cart
    }

    #[tokio::test]
    async fn test_cash_checkout_decrements_stock_and_records_sale() {
        let (db, coke, chips) = seeded_db().await;
        let cart = scenario_cart(&coke, &chips);

        let receipt = db
            .checkout()
            .commit(&cart, "maria", Tender::Cash { tendered_cents: 15000 }, false)
            .await
            .unwrap();

        assert_eq!(receipt.grand_total_cents, 13000);
        assert_eq!(receipt.change_cents, 2000);
        assert!(!receipt.discount_applied);

        // Stock moved
        assert_eq!(db.items().get_by_id(coke.id).await.unwrap().stock_count, 7);
        assert_eq!(db.items().get_by_id(chips.id).await.unwrap().stock_count, 0);

        // Ledger row matches the receipt, snapshot at sale-time prices
        let sale = db.sales().get_by_id(receipt.sale_id).await.unwrap().unwrap();
        assert_eq!(sale.grand_total_cents, 13000);
        assert_eq!(sale.line_items.len(), 2);
        assert_eq!(sale.line_items[0].unit_price_cents, 2000);
    }

    #[tokio::test]
    async fn test_discount_checkout() {
        let (db, coke, chips) = seeded_db().await;
        let cart = scenario_cart(&coke, &chips);

        let receipt = db
            .checkout()
            .commit(&cart, "maria", Tender::Card, true)
            .await
            .unwrap();

        // 130.00 × 0.8 = 104.00
        assert_eq!(receipt.grand_total_cents, 10400);
        assert_eq!(receipt.subtotal_cents, 13000);
        assert!(receipt.discount_applied);
        assert_eq!(receipt.payment_method, PaymentMethod::Card);
    }

    #[tokio::test]
    async fn test_oversell_rolls_back_everything() {
        let (db, coke, chips) = seeded_db().await;

        let mut cart = Cart::new();
        cart.add_line(&coke, 3).unwrap();
        cart.add_line(&chips, 5).unwrap(); // only 2 in stock

        let err = db
            .checkout()
            .commit(&cart, "maria", Tender::Card, false)
            .await
            .unwrap_err();

        match err {
            ServiceError::Core(CoreError::InsufficientStock {
                name,
                available,
                requested,
            }) => {
                assert_eq!(name, "Chips");
                assert_eq!(available, 2);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Coke's decrement rolled back with the rest
        assert_eq!(db.items().get_by_id(coke.id).await.unwrap().stock_count, 10);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_short_cash_never_opens_transaction() {
        let (db, coke, chips) = seeded_db().await;
        let cart = scenario_cart(&coke, &chips);

        let err = db
            .checkout()
            .commit(&cart, "maria", Tender::Cash { tendered_cents: 10000 }, false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Core(CoreError::InsufficientPayment {
                shortfall_cents: 3000
            })
        ));
        assert_eq!(db.items().get_by_id(coke.id).await.unwrap().stock_count, 10);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let (db, _, _) = seeded_db().await;
        let cart = Cart::new();

        let err = db
            .checkout()
            .commit(&cart, "maria", Tender::Card, false)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Core(CoreError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_blank_cashier_rejected() {
        let (db, coke, chips) = seeded_db().await;
        let cart = scenario_cart(&coke, &chips);

        let err = db
            .checkout()
            .commit(&cart, "  ", Tender::Card, false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(_))
        ));
    }
}
