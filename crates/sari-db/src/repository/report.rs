//! # Report Repository
//!
//! Aggregate reads over the sales ledger for the dashboard.
//!
//! ## Query Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      ReportRepository                           │
//! │                                                                 │
//! │  ReportWindow ─► [start, end) bounds (sari-core, pure)          │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  WHERE created_at >= ?start AND created_at < ?end               │
//! │       │                                                         │
//! │       ├── sales_total / sale_count / estimated_profit           │
//! │       ├── top_cashier     (GROUP BY cashier, highest SUM)       │
//! │       ├── payment_split   (cash vs card totals)                 │
//! │       └── monthly/daily series (gap-filled in sari-core)        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Refunds are deliberately NOT netted out of these figures; the dashboard
//! reports gross sales, matching the receipts in the till.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sqlx::SqlitePool;

use sari_core::reporting::{self, PaymentSplit, ReportWindow, TopCashier};
use sari_core::Money;

use crate::error::{DbError, DbResult};

/// Repository for dashboard aggregates.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new report repository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Gross sales total (grand totals summed) inside the window.
    pub async fn sales_total(&self, window: ReportWindow) -> DbResult<Money> {
        let (start, end) = window.bounds(Utc::now());

        let total = sqlx::query_scalar::<_, Option<i64>>(
            r#"
            SELECT SUM(grand_total_cents)
            FROM sales
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(total.unwrap_or(0)))
    }

    /// Number of transactions inside the window.
    pub async fn sale_count(&self, window: ReportWindow) -> DbResult<i64> {
        let (start, end) = window.bounds(Utc::now());

        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM sales
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Estimated profit inside the window, using the assumed flat margin.
    ///
    /// The shop does not track item cost, so this is an estimate by
    /// definition; the dashboard labels it as such.
    pub async fn estimated_profit(&self, window: ReportWindow) -> DbResult<Money> {
        let total = self.sales_total(window).await?;
        Ok(total.estimated_profit())
    }

    /// The cashier with the highest summed grand total on the given day.
    ///
    /// Returns `None` when the day has no sales.
    pub async fn top_cashier(&self, date: NaiveDate) -> DbResult<Option<TopCashier>> {
        let (start, end) = ReportWindow::On(date).bounds(Utc::now());

        let row = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT cashier, SUM(grand_total_cents) AS total
            FROM sales
            WHERE created_at >= ?1 AND created_at < ?2
            GROUP BY cashier
            ORDER BY total DESC
            LIMIT 1
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(cashier, total_cents)| TopCashier {
            cashier,
            total_cents,
        }))
    }

    /// Cash vs card totals for the given day.
    pub async fn payment_split(&self, date: NaiveDate) -> DbResult<PaymentSplit> {
        let (start, end) = ReportWindow::On(date).bounds(Utc::now());

        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT payment_method, SUM(grand_total_cents)
            FROM sales
            WHERE created_at >= ?1 AND created_at < ?2
            GROUP BY payment_method
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut split = PaymentSplit::default();
        for (method, total) in rows {
            match method.as_str() {
                "cash" => split.cash_cents = total,
                "card" => split.card_cents = total,
                other => {
                    return Err(DbError::Internal(format!(
                        "unknown payment method '{other}' in sales ledger"
                    )))
                }
            }
        }

        Ok(split)
    }

    /// Dense Jan..Dec sales series for the given year (zero-filled months).
    pub async fn monthly_series(&self, year: i32) -> DbResult<[Money; 12]> {
        let rows = self
            .window_rows(
                NaiveDate::from_ymd_opt(year, 1, 1),
                NaiveDate::from_ymd_opt(year + 1, 1, 1),
            )
            .await?;

        Ok(reporting::monthly_series(year, &rows))
    }

    /// Dense per-day sales series for the given month (leap-aware length).
    pub async fn daily_series(&self, year: i32, month: u32) -> DbResult<Vec<Money>> {
        let first = NaiveDate::from_ymd_opt(year, month, 1);
        let next = first.map(|d| {
            if d.month() == 12 {
                NaiveDate::from_ymd_opt(d.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(d.year(), d.month() + 1, 1)
            }
        });

        let rows = self.window_rows(first, next.flatten()).await?;

        reporting::daily_series(year, month, &rows)
            .map_err(|e| DbError::QueryFailed(e.to_string()))
    }

    /// Fetches (created_at, grand_total_cents) rows between two dates.
    async fn window_rows(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> DbResult<Vec<(DateTime<Utc>, i64)>> {
        let (start, end) = match (start, end) {
            (Some(s), Some(e)) => (
                ReportWindow::On(s).bounds(Utc::now()).0,
                ReportWindow::On(e).bounds(Utc::now()).0,
            ),
            _ => {
                return Err(DbError::QueryFailed(
                    "invalid year/month for report series".to_string(),
                ))
            }
        };

        let rows = sqlx::query_as::<_, (DateTime<Utc>, i64)>(
            r#"
            SELECT created_at, grand_total_cents
            FROM sales
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
