//! # Sari DB
//!
//! Persistence layer for the Sari POS: SQLite via sqlx, owning the sales
//! ledger, the refund ledger, the catalog, and the transactional flows that
//! tie them together.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              sari-db                                   │
//! │                                                                         │
//! │  ┌──────────────┐      ┌──────────────────────────────────────────┐    │
//! │  │   Database   │──┬──►│ Repositories (single-table access)        │    │
//! │  │ (pool + cfg) │  │   │   ItemRepository    SaleRepository        │    │
//! │  └──────────────┘  │   │   RefundRepository  ReportRepository      │    │
//! │                    │   └──────────────────────────────────────────┘    │
//! │                    │   ┌──────────────────────────────────────────┐    │
//! │                    └──►│ Services (one operation = one transaction)│    │
//! │                        │   CheckoutService   RefundService         │    │
//! │                        └──────────────────────────────────────────┘    │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                      SQLite (WAL) + embedded migrations                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain math (money, cart, settlement, refund planning, report windows)
//! lives in `sari-core`; this crate binds it to storage.
//!
//! ## Usage
//! ```rust,ignore
//! use sari_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./sari.db")).await?;
//!
//! let catalog = db.items().list_available().await?;
//! let receipt = db.checkout().commit(&cart, "maria", tender, false).await?;
//! let ctx = db.refund().lookup(receipt.sale_id).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// Re-export main types at crate root
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::item::ItemRepository;
pub use repository::refund::RefundRepository;
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;
pub use service::checkout::{CheckoutService, Receipt};
pub use service::refund::{RefundContext, RefundService};
pub use service::{ServiceError, ServiceResult};
