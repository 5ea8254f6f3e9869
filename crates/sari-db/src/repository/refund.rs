//! # Refund Repository
//!
//! Reads and row inserts for the refund ledger (`refunds` + `refund_lines`).
//!
//! ## Cumulative Refund Accounting
//! ```text
//! sale 17, line 0: bought 3 × Coke
//!
//!   refund A: 2 units  ──► refund_lines (sale 17, line 0, qty 2)
//!   refund B: 1 unit   ──► refund_lines (sale 17, line 0, qty 1)
//!   refund C: 1 unit   ──► REJECTED: SUM(quantity) for (17, 0) is already 3
//! ```
//!
//! `refunded_quantities` is the SUM side of that picture; the core refund
//! planner uses it to bound each new attempt.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool};

use sari_core::types::RefundRecord;
use sari_core::RefundPlan;

use crate::error::{DbError, DbResult};

/// Repository for the refund ledger.
#[derive(Debug, Clone)]
pub struct RefundRepository {
    pool: SqlitePool,
}

impl RefundRepository {
    /// Creates a new refund repository.
    pub fn new(pool: SqlitePool) -> Self {
        RefundRepository { pool }
    }

    /// Lists refunds recorded against a sale, oldest first.
    pub async fn list_for_sale(&self, sale_id: i64) -> DbResult<Vec<RefundRecord>> {
        let refunds = sqlx::query_as::<_, RefundRecord>(
            r#"
            SELECT id, sale_id, refund_amount_cents, processed_by, processed_at
            FROM refunds
            WHERE sale_id = ?1
            ORDER BY id ASC
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(refunds)
    }

    /// Returns the cumulative refunded quantity per snapshot line, as a vec
    /// aligned with the sale's line items (`line_count` entries, zero where
    /// nothing was refunded yet).
    pub async fn refunded_quantities(&self, sale_id: i64, line_count: usize) -> DbResult<Vec<i64>> {
        Self::refunded_quantities_on(&self.pool, sale_id, line_count).await
    }

    /// Executor-parametric form of [`Self::refunded_quantities`], so the
    /// refund service can re-check bounds inside its own transaction.
    pub async fn refunded_quantities_on<'e, E>(
        executor: E,
        sale_id: i64,
        line_count: usize,
    ) -> DbResult<Vec<i64>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT line_index, SUM(quantity)
            FROM refund_lines
            WHERE sale_id = ?1
            GROUP BY line_index
            "#,
        )
        .bind(sale_id)
        .fetch_all(executor)
        .await?;

        let mut per_line = vec![0i64; line_count];
        for (line_index, total) in rows {
            let idx = usize::try_from(line_index).map_err(|_| {
                DbError::Internal(format!(
                    "negative line_index {line_index} in refund_lines for sale {sale_id}"
                ))
            })?;
            if idx >= line_count {
                return Err(DbError::Internal(format!(
                    "refund_lines references line {idx} but sale {sale_id} has {line_count} lines"
                )));
            }
            per_line[idx] = total;
        }

        Ok(per_line)
    }

    /// Inserts a refund row plus its per-line entries on the given
    /// transaction, returning the refund's ledger id.
    ///
    /// Must run inside the refund service's transaction so the ledger rows
    /// and the restocks commit together.
    pub async fn insert(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        plan: &RefundPlan,
        processed_by: &str,
        processed_at: DateTime<Utc>,
    ) -> DbResult<i64> {
        let refund_id = sqlx::query(
            r#"
            INSERT INTO refunds (sale_id, refund_amount_cents, processed_by, processed_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(plan.sale_id)
        .bind(plan.refund_amount_cents)
        .bind(processed_by)
        .bind(processed_at)
        .execute(&mut **tx)
        .await?
        .last_insert_rowid();

        for line in &plan.lines {
            // Zero-quantity lines never reach a plan, so every row satisfies
            // the quantity > 0 CHECK
            sqlx::query(
                r#"
                INSERT INTO refund_lines (refund_id, sale_id, line_index, quantity)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(refund_id)
            .bind(plan.sale_id)
            .bind(line.line_index as i64)
            .bind(line.quantity)
            .execute(&mut **tx)
            .await?;
        }

        Ok(refund_id)
    }

    /// Sums all refund amounts against a sale.
    pub async fn total_refunded(&self, sale_id: i64) -> DbResult<i64> {
        let total = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT SUM(refund_amount_cents) FROM refunds WHERE sale_id = ?1",
        )
        .bind(sale_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::sale::SaleRepository;
    use sari_core::types::{LineItem, PaymentMethod};
    use sari_core::RefundLinePlan;

    async fn seeded_sale(db: &Database) -> i64 {
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
        SaleRepository::insert(
            db.pool(),
            "maria",
            PaymentMethod::Cash,
            13000,
            13000,
            false,
            &lines,
            Utc::now(),
        )
        .await
        .unwrap()
    }

    fn plan(sale_id: i64, line_index: usize, quantity: i64, amount: i64) -> RefundPlan {
        RefundPlan {
            sale_id,
            refund_amount_cents: amount,
            lines: vec![RefundLinePlan {
                line_index,
                item_id: 1,
                name: "Coke".to_string(),
                unit_price_cents: 2000,
                quantity,
                amount_cents: amount,
            }],
        }
    }

    #[tokio::test]
    async fn test_refunded_quantities_accumulate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sale_id = seeded_sale(&db).await;
        let repo = db.refunds();

        // No refunds yet: all zeros
        let qty = repo.refunded_quantities(sale_id, 2).await.unwrap();
        assert_eq!(qty, vec![0, 0]);

        let mut tx = db.pool().begin().await.unwrap();
        RefundRepository::insert(&mut tx, &plan(sale_id, 0, 2, 4000), "maria", Utc::now())
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        RefundRepository::insert(&mut tx, &plan(sale_id, 0, 1, 2000), "jose", Utc::now())
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let qty = repo.refunded_quantities(sale_id, 2).await.unwrap();
        assert_eq!(qty, vec![3, 0]);

        assert_eq!(repo.total_refunded(sale_id).await.unwrap(), 6000);
        assert_eq!(repo.list_for_sale(sale_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_refund_requires_existing_sale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let err = RefundRepository::insert(&mut tx, &plan(999, 0, 1, 2000), "maria", Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
