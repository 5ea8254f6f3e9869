//! # Service Layer
//!
//! Multi-table write flows that must commit or roll back as a unit.
//!
//! ## Why Services Exist Separately From Repositories
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Repository: one table, pool-bound, simple reads/writes           │
//! │  Service:    one BUSINESS OPERATION, one SQLite transaction       │
//! │                                                                   │
//! │  CheckoutService::commit                                          │
//! │      BEGIN                                                        │
//! │        for each line: conditional stock decrement                 │
//! │        INSERT sale row (with JSON line snapshot)                  │
//! │      COMMIT   ← sale and decrements land together, or not at all  │
//! │                                                                   │
//! │  RefundService::commit                                            │
//! │      BEGIN                                                        │
//! │        re-check cumulative refund bounds                          │
//! │        INSERT refund + refund_lines rows                          │
//! │        for each line: restock by snapshot item_id                 │
//! │      COMMIT                                                       │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each commit runs under the pool's configured operation timeout; a commit
//! that exceeds it surfaces as `DbError::Timeout` with nothing persisted.

pub mod checkout;
pub mod refund;

use thiserror::Error;

use crate::error::DbError;
use sari_core::error::CoreError;

/// Errors surfaced by the service layer to the presentation layer.
///
/// Joins domain failures (cart math, refund bounds) with persistence
/// failures under one type so callers match once.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A domain rule rejected the operation (empty cart, short cash,
    /// over-refund, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The database rejected or failed the operation.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The operator typed a transaction number that isn't in the ledger.
    #[error("Transaction #{0} not found")]
    TransactionNotFound(i64),

    /// A refund line references a catalog item that has since been deleted;
    /// the whole refund is aborted rather than partially restocked.
    #[error("Item '{name}' from this sale no longer exists in the catalog")]
    ItemNoLongerExists { name: String },
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
