//! # Refund Service
//!
//! The refund desk flow: look up a sale by its transaction number, plan a
//! partial refund per line, and commit it atomically.
//!
//! ## Desk Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          RefundService                                  │
//! │                                                                         │
//! │  1. lookup(sale_id)                                                     │
//! │        ledger row + cumulative refunded-per-line                        │
//! │        │  TransactionNotFound if the number isn't in the ledger         │
//! │        ▼                                                                │
//! │  2. plan(ctx, requested)          ← pure, sari-core                     │
//! │        bounds every line by quantity − already refunded                 │
//! │        │  the plan IS the confirmation screen: exact amount + lines     │
//! │        ▼                                                                │
//! │  3. commit(plan, processed_by)                                          │
//! │        BEGIN                                                            │
//! │          re-check bounds (another refund may have landed since 2)       │
//! │          INSERT refunds + refund_lines                                  │
//! │          restock each line by its SNAPSHOT item_id                      │
//! │             │ item deleted? ──► ROLLBACK, ItemNoLongerExists            │
//! │        COMMIT                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Restocking resolves by the snapshot's item_id, never by name: a renamed
//! item still restocks correctly, and a name reused by a different product
//! can never receive another product's returns.

use chrono::Utc;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{info, warn};

use sari_core::error::CoreError;
use sari_core::refund::{plan_refund, RefundPlan};
use sari_core::types::{RefundRecord, SaleRecord};
use sari_core::validation::validate_actor;

use crate::error::DbError;
use crate::repository::item::ItemRepository;
use crate::repository::refund::RefundRepository;
use crate::repository::sale::SaleRepository;
use crate::service::{ServiceError, ServiceResult};

// =============================================================================
// Refund Context
// =============================================================================

/// Everything the refund desk needs to show after a transaction lookup.
#[derive(Debug, Clone)]
pub struct RefundContext {
    /// The sale as recorded, with its frozen line snapshot.
    pub sale: SaleRecord,

    /// Cumulative refunded quantity per snapshot line, same order.
    pub refunded: Vec<i64>,
}

impl RefundContext {
    /// Remaining refundable quantity per line, same order as the snapshot.
    pub fn refundable(&self) -> Vec<i64> {
        self.sale
            .line_items
            .iter()
            .zip(&self.refunded)
            .map(|(line, refunded)| (line.quantity - refunded).max(0))
            .collect()
    }
}

// =============================================================================
// Refund Service
// =============================================================================

/// Lookup / plan / transactional commit for refunds.
#[derive(Debug, Clone)]
pub struct RefundService {
    pool: SqlitePool,
    op_timeout: Duration,
}

impl RefundService {
    /// Creates a new refund service.
    pub fn new(pool: SqlitePool, op_timeout: Duration) -> Self {
        RefundService { pool, op_timeout }
    }

    /// Looks up a sale by the transaction number the operator typed in.
    ///
    /// ## Errors
    /// - `ServiceError::TransactionNotFound` for an unknown number
    pub async fn lookup(&self, sale_id: i64) -> ServiceResult<RefundContext> {
        let sale = SaleRepository::get_by_id_on(&self.pool, sale_id)
            .await?
            .ok_or(ServiceError::TransactionNotFound(sale_id))?;

        let refunded = RefundRepository::refunded_quantities_on(
            &self.pool,
            sale_id,
            sale.line_items.len(),
        )
        .await?;

        Ok(RefundContext { sale, refunded })
    }

    /// Plans a refund against a looked-up sale. Pure; nothing is persisted.
    ///
    /// The returned plan carries the exact amount and lines the confirmation
    /// screen shows; [`Self::commit`] persists exactly that plan.
    pub fn plan(&self, ctx: &RefundContext, requested: &[i64]) -> ServiceResult<RefundPlan> {
        let plan = plan_refund(
            ctx.sale.id,
            &ctx.sale.line_items,
            &ctx.refunded,
            requested,
        )?;
        Ok(plan)
    }

    /// Commits a confirmed refund plan: ledger rows and restocks in one
    /// transaction.
    ///
    /// Takes the plan by value; a committed plan is gone and another refund
    /// starts from a fresh [`Self::lookup`].
    ///
    /// ## Errors
    /// - `ServiceError::TransactionNotFound` if the sale vanished (never
    ///   happens on an append-only ledger, but checked)
    /// - `ServiceError::Core(RefundExceedsPurchase)` if another refund landed
    ///   between plan and commit and the plan no longer fits
    /// - `ServiceError::ItemNoLongerExists` if any line's item was deleted
    ///   from the catalog; the entire refund rolls back
    /// - `ServiceError::Db(Timeout)` when the commit exceeds the op timeout
    pub async fn commit(&self, plan: RefundPlan, processed_by: &str) -> ServiceResult<RefundRecord> {
        validate_actor(processed_by).map_err(CoreError::from)?;

        let work = self.commit_tx(&plan, processed_by);
        let record = match tokio::time::timeout(self.op_timeout, work).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    sale_id = plan.sale_id,
                    "Refund commit timed out, transaction dropped"
                );
                return Err(DbError::Timeout(self.op_timeout).into());
            }
        };

        info!(
            refund_id = record.id,
            sale_id = record.sale_id,
            amount_cents = record.refund_amount_cents,
            processed_by,
            "Refund committed"
        );

        Ok(record)
    }

    /// The transactional body: bound re-check, ledger rows, restocks.
    async fn commit_tx(&self, plan: &RefundPlan, processed_by: &str) -> ServiceResult<RefundRecord> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        // Re-read ledger state on this transaction; a refund committed after
        // the plan was drawn up must still be counted against the bounds.
        let sale = SaleRepository::get_by_id_on(&mut *tx, plan.sale_id)
            .await?
            .ok_or(ServiceError::TransactionNotFound(plan.sale_id))?;

        let refunded = RefundRepository::refunded_quantities_on(
            &mut *tx,
            plan.sale_id,
            sale.line_items.len(),
        )
        .await?;

        for line in &plan.lines {
            let original = sale
                .line_items
                .get(line.line_index)
                .ok_or(CoreError::LineMismatch {
                    given: line.line_index + 1,
                    expected: sale.line_items.len(),
                })?;
            let already = refunded[line.line_index];

            if line.quantity > original.quantity - already {
                return Err(CoreError::RefundExceedsPurchase {
                    name: original.name.clone(),
                    requested: line.quantity,
                    purchased: original.quantity,
                    already_refunded: already,
                    refundable: (original.quantity - already).max(0),
                }
                .into());
            }
        }

        let refund_id =
            RefundRepository::insert(&mut tx, plan, processed_by, Utc::now()).await?;

        for line in &plan.lines {
            // A positive delta always passes the floor guard, so zero rows
            // can only mean the catalog row is gone
            let restocked =
                ItemRepository::adjust_stock(&mut *tx, line.item_id, line.quantity).await?;

            if !restocked {
                // Snapshot references an item since deleted from the catalog;
                // abort the whole refund rather than restock partially.
                return Err(ServiceError::ItemNoLongerExists {
                    name: line.name.clone(),
                });
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(RefundRecord {
            id: refund_id,
            sale_id: plan.sale_id,
            refund_amount_cents: plan.refund_amount_cents,
            processed_by: processed_by.to_string(),
            processed_at: Utc::now(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
