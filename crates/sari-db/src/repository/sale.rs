//! # Sale Repository
//!
//! Reads against the append-only `sales` ledger.
//!
//! Sales are only ever inserted inside a checkout transaction (see
//! [`crate::service::checkout`]); this repository also exposes the insert
//! so the service can run it on its own transaction handle.
//!
//! ## Line Item Snapshots
//! Each sale row carries a JSON snapshot of its cart lines. The snapshot is
//! the refund desk's source of truth: refunds price against the unit price
//! the customer actually paid, even after the catalog changes.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool};

use sari_core::types::{LineItem, PaymentMethod, SaleRecord};

use crate::error::{DbError, DbResult};

/// Raw `sales` row before the JSON snapshot is decoded.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i64,
    cashier: String,
    payment_method: PaymentMethod,
    subtotal_cents: i64,
    grand_total_cents: i64,
    discount_applied: bool,
    line_items: String,
    created_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_record(self) -> DbResult<SaleRecord> {
        let line_items: Vec<LineItem> = serde_json::from_str(&self.line_items).map_err(|e| {
            DbError::Internal(format!(
                "corrupt line_items snapshot on sale {}: {e}",
                self.id
            ))
        })?;

        Ok(SaleRecord {
            id: self.id,
            cashier: self.cashier,
            payment_method: self.payment_method,
            subtotal_cents: self.subtotal_cents,
            grand_total_cents: self.grand_total_cents,
            discount_applied: self.discount_applied,
            line_items,
            created_at: self.created_at,
        })
    }
}

/// Repository for the sales ledger.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new sale repository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by its ledger id (the transaction number on the receipt).
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<SaleRecord>> {
        Self::get_by_id_on(&self.pool, id).await
    }

    /// Executor-parametric form of [`Self::get_by_id`], so the refund service
    /// can re-read the sale inside its own transaction.
    pub async fn get_by_id_on<'e, E>(executor: E, id: i64) -> DbResult<Option<SaleRecord>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, cashier, payment_method, subtotal_cents, grand_total_cents,
                   discount_applied, line_items, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        row.map(SaleRow::into_record).transpose()
    }

    /// Lists the most recent sales, newest first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<SaleRecord>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, cashier, payment_method, subtotal_cents, grand_total_cents,
                   discount_applied, line_items, created_at
            FROM sales
            ORDER BY created_at DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SaleRow::into_record).collect()
    }

    /// Counts all recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts a sale row on the given executor and returns its ledger id.
    ///
    /// Runs on the checkout service's transaction so the sale row and the
    /// stock decrements commit or roll back together.
    pub async fn insert<'e, E>(
        executor: E,
        cashier: &str,
        payment_method: PaymentMethod,
        subtotal_cents: i64,
        grand_total_cents: i64,
        discount_applied: bool,
        line_items: &[LineItem],
        created_at: DateTime<Utc>,
    ) -> DbResult<i64>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let snapshot = serde_json::to_string(line_items)
            .map_err(|e| DbError::Internal(format!("failed to encode line items: {e}")))?;

        let id = sqlx::query(
            r#"
            INSERT INTO sales (cashier, payment_method, subtotal_cents, grand_total_cents,
                               discount_applied, line_items, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(cashier)
        .bind(payment_method)
        .bind(subtotal_cents)
        .bind(grand_total_cents)
        .bind(discount_applied)
        .bind(snapshot)
        .bind(created_at)
        .execute(executor)
        .await?
        .last_insert_rowid();

        Ok(id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample_lines() -> Vec<LineItem> {
        vec![
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
        ]
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let lines = sample_lines();

        let id = SaleRepository::insert(
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
        .unwrap();

        let sale = db.sales().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(sale.cashier, "maria");
        assert_eq!(sale.grand_total_cents, 13000);
        assert_eq!(sale.line_items.len(), 2);
        assert_eq!(sale.line_items[0].unit_price_cents, 2000);
        assert!(!sale.discount_applied);
    }

    #[tokio::test]
    async fn test_get_missing_sale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.sales().get_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_recent_orders_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let lines = sample_lines();

        for _ in 0..3 {
            SaleRepository::insert(
                db.pool(),
                "maria",
                PaymentMethod::Card,
                13000,
                10400,
                true,
                &lines,
                Utc::now(),
            )
            .await
            .unwrap();
        }

        let recent = db.sales().list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].id > recent[1].id);
        assert!(recent[0].discount_applied);
    }
}
