//! # Repository Layer
//!
//! Data access for the POS ledger, organized one repository per aggregate.
//!
//! ## Pattern
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Repository Layer                       │
//! │                                                              │
//! │  Service / caller                                            │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ItemRepository ───► items table (catalog + stock)           │
//! │  SaleRepository ───► sales table (append-only ledger)        │
//! │  RefundRepository ─► refunds + refund_lines tables           │
//! │  ReportRepository ─► aggregate reads across sales/refunds    │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories cover simple reads and single-row writes. Multi-table
//! writes (checkout, refund commit) live in [`crate::service`] so the
//! whole operation shares one SQLite transaction.

pub mod item;
pub mod refund;
pub mod report;
pub mod sale;
