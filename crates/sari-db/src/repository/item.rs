//! # Item Repository
//!
//! Catalog and stock access for the `items` table.
//!
//! ## Responsibilities
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                       ItemRepository                           │
//! │                                                                │
//! │  Reads                                                         │
//! │    list_available() ──► sellable catalog (stock > 0, by name) │
//! │    list_all()       ──► full catalog including sold-out rows  │
//! │    get_by_id() / get_by_name()                                 │
//! │                                                                │
//! │  Writes                                                        │
//! │    create() / update()                                         │
//! │    adjust_stock(id, delta) ──► conditional UPDATE; the row is │
//! │        only touched when stock_count + delta >= 0, so a        │
//! │        concurrent oversell loses the race instead of driving   │
//! │        stock negative                                          │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};
use tracing::debug;

use sari_core::types::Item;
use sari_core::validation::{validate_item_name, validate_price_cents, validate_stock_count};

use crate::error::{DbError, DbResult};

/// Repository for catalog items.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new item repository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lists the sellable catalog: items with stock on hand, ordered by name.
    ///
    /// This is the view the register shows; sold-out items are hidden rather
    /// than shown as unorderable.
    pub async fn list_available(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, price_cents, stock_count, created_at, updated_at
            FROM items
            WHERE stock_count > 0
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists every item, including sold-out ones (inventory management view).
    pub async fn list_all(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, price_cents, stock_count, created_at, updated_at
            FROM items
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets an item by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Item> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, price_cents, stock_count, created_at, updated_at
            FROM items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        item.ok_or_else(|| DbError::not_found("Item", id))
    }

    /// Gets an item by its exact (case-sensitive) name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, price_cents, stock_count, created_at, updated_at
            FROM items
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Counts all items in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates a new catalog item.
    ///
    /// ## Errors
    /// - `DbError::UniqueViolation` if an item with this name already exists
    /// - `DbError::InvalidInput` on validation failure (name/price/stock)
    pub async fn create(&self, name: &str, price_cents: i64, stock_count: i64) -> DbResult<Item> {
        validate_item_name(name).map_err(|e| DbError::InvalidInput(e.to_string()))?;
        validate_price_cents(price_cents).map_err(|e| DbError::InvalidInput(e.to_string()))?;
        validate_stock_count(stock_count).map_err(|e| DbError::InvalidInput(e.to_string()))?;

        let now = Utc::now();

        let id = sqlx::query(
            r#"
            INSERT INTO items (name, price_cents, stock_count, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
        )
        .bind(name)
        .bind(price_cents)
        .bind(stock_count)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("item name", name),
            other => other,
        })?
        .last_insert_rowid();

        debug!(item_id = id, name, "Item created");

        self.get_by_id(id).await
    }

    /// Updates an item's name, price, and stock in place.
    ///
    /// ## Errors
    /// - `DbError::NotFound` if no item has this id
    /// - `DbError::UniqueViolation` if the new name collides with another item
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        price_cents: i64,
        stock_count: i64,
    ) -> DbResult<Item> {
        validate_item_name(name).map_err(|e| DbError::InvalidInput(e.to_string()))?;
        validate_price_cents(price_cents).map_err(|e| DbError::InvalidInput(e.to_string()))?;
        validate_stock_count(stock_count).map_err(|e| DbError::InvalidInput(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE items
            SET name = ?2, price_cents = ?3, stock_count = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(price_cents)
        .bind(stock_count)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("item name", name),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        self.get_by_id(id).await
    }

    /// Adjusts an item's stock by a signed delta, refusing to go negative.
    ///
    /// The guard lives in the WHERE clause, so two registers racing over the
    /// last unit resolve at the database: one UPDATE matches, the other
    /// matches zero rows. Returns whether a row was updated; a `false` means
    /// the item is gone or the delta would oversell, and the caller decides
    /// which of the two it is (the checkout and refund services each map it
    /// to their own domain error).
    ///
    /// Works both on the pool and inside a caller's transaction via the
    /// executor parameter.
    pub async fn adjust_stock<'e, E>(executor: E, id: i64, delta: i64) -> DbResult<bool>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET stock_count = stock_count + ?2, updated_at = ?3
            WHERE id = ?1 AND stock_count + ?2 >= 0
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(Utc::now())
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Pool-bound stock adjustment for inventory management (restocks,
    /// shrinkage corrections).
    ///
    /// ## Errors
    /// - `DbError::NotFound` if no item has this id
    /// - `DbError::InsufficientStock` if the delta would drive stock negative
    pub async fn adjust_stock_by(&self, id: i64, delta: i64) -> DbResult<()> {
        if Self::adjust_stock(&self.pool, id, delta).await? {
            return Ok(());
        }

        // Zero rows: distinguish a missing item from an oversold delta
        let item = self.get_by_id(id).await?;
        Err(DbError::InsufficientStock {
            name: item.name,
            available: item.stock_count,
            requested: -delta,
        })
    }

    /// Deletes an item from the catalog.
    ///
    /// Sale snapshots keep their own copy of the item's name and price, so
    /// past receipts are unaffected. A later refund against such a sale is
    /// aborted by the refund service because there is nothing to restock.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        debug!(item_id = id, "Item deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;
        let repo = db.items();

        let item = repo.create("Coke 1.5L", 2000, 10).await.unwrap();
        assert_eq!(item.name, "Coke 1.5L");
        assert_eq!(item.price_cents, 2000);
        assert_eq!(item.stock_count, 10);

        let fetched = repo.get_by_id(item.id).await.unwrap();
        assert_eq!(fetched.name, item.name);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = test_db().await;
        let repo = db.items();

        repo.create("Chips", 3500, 5).await.unwrap();
        let err = repo.create("Chips", 3000, 2).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_name_is_case_sensitive() {
        let db = test_db().await;
        let repo = db.items();

        repo.create("Chips", 3500, 5).await.unwrap();
        // Different case is a distinct catalog entry
        repo.create("chips", 3500, 5).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
        assert!(repo.get_by_name("CHIPS").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_available_hides_sold_out() {
        let db = test_db().await;
        let repo = db.items();

        repo.create("Coke", 2000, 3).await.unwrap();
        repo.create("Biscuit", 1000, 0).await.unwrap();

        let available = repo.list_available().await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "Coke");

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        // Ordered by name
        assert_eq!(all[0].name, "Biscuit");
    }

    #[tokio::test]
    async fn test_adjust_stock_guard() {
        let db = test_db().await;
        let repo = db.items();

        let item = repo.create("Coke", 2000, 3).await.unwrap();

        // Removing more than is on hand is an InsufficientStock error
        let err = repo.adjust_stock_by(item.id, -5).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            }
        ));

        repo.adjust_stock_by(item.id, -2).await.unwrap();
        assert_eq!(repo.get_by_id(item.id).await.unwrap().stock_count, 1);

        // Would go negative: rejected with the item's actual availability,
        // stock unchanged
        let err = repo.adjust_stock_by(item.id, -2).await.unwrap_err();
        match err {
            DbError::InsufficientStock {
                name,
                available,
                requested,
            } => {
                assert_eq!(name, "Coke");
                assert_eq!(available, 1);
                assert_eq!(requested, 2);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(repo.get_by_id(item.id).await.unwrap().stock_count, 1);

        // Missing item reads as NotFound, not as an oversell
        let err = repo.adjust_stock_by(999, -1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // Restock
        repo.adjust_stock_by(item.id, 5).await.unwrap();
        assert_eq!(repo.get_by_id(item.id).await.unwrap().stock_count, 6);
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let db = test_db().await;
        let repo = db.items();

        let err = repo.update(999, "Ghost", 100, 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_price_rejected() {
        let db = test_db().await;
        let repo = db.items();

        assert!(matches!(
            repo.create("Free", 0, 1).await.unwrap_err(),
            DbError::InvalidInput(_)
        ));
        assert!(matches!(
            repo.create("", 100, 1).await.unwrap_err(),
            DbError::InvalidInput(_)
        ));
        assert!(matches!(
            repo.create("Negative stock", 100, -1).await.unwrap_err(),
            DbError::InvalidInput(_)
        ));
    }
}
