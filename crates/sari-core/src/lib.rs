//! # sari-core: Pure Business Logic for Sari POS
//!
//! This crate is the **heart** of Sari POS. It contains all sale/refund
//! accounting rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sari POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (register / manager UI)              │   │
//! │  │    Catalog view ──► Cart ──► Tender ──► Receipt / Dashboards   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              sari-db: services + repositories                   │   │
//! │  │    CheckoutService, RefundService, ReportRepository             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sari-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  checkout │  │   │
//! │  │   │   Item    │  │   Money   │  │   Cart    │  │ settlement│  │   │
//! │  │   │SaleRecord │  │ discount  │  │ CartLine  │  │   math    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                 │   │
//! │  │   │  refund   │  │ reporting │  │ validation│                 │   │
//! │  │   │ planning  │  │  windows  │  │   rules   │                 │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, SaleRecord, RefundRecord, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cashier's transient working cart
//! - [`checkout`] - Settlement math: discount, tender, change
//! - [`refund`] - Refund planning: per-line bounds and amounts
//! - [`reporting`] - Calendar windows and dense chart series
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use sari_core::money::Money;
//!
//! // Create money from centavos (never from floats!)
//! let price = Money::from_cents(2000); // ₱20.00
//!
//! // The fixed 20% concessionary checkout discount
//! let discounted = price.apply_concession_discount();
//! assert_eq!(discounted.cents(), 1600); // ₱16.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod refund;
pub mod reporting;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use sari_core::Money` instead of
// `use sari_core::money::Money`

pub use cart::{Cart, CartLine};
pub use checkout::{Settlement, Tender};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use refund::{RefundLinePlan, RefundPlan};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fixed concessionary checkout discount, in basis points (2000 = 20%).
///
/// ## Why a constant?
/// The rate is store policy, not mechanism. It applies exactly once per sale
/// when the cashier ticks the discount flag at tender time. Making it a named
/// constant keeps the policy visible and out of the arithmetic.
pub const CONCESSION_DISCOUNT_BPS: u32 = 2000;

/// Assumed profit margin for dashboard KPIs, in basis points (2500 = 25%).
///
/// ## Why a constant?
/// The shop does not track per-item cost, so "profit" figures are an estimate
/// over gross sales. Store policy, subject to change; keep it named.
pub const ASSUMED_PROFIT_MARGIN_BPS: u32 = 2500;

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum unit price for a catalog item, in centavos (₱1,000,000.00).
///
/// ## Business Reason
/// Nothing on a sari-sari store shelf costs a million pesos; an entry above
/// this is a typo. The cap also keeps every reachable total
/// (`MAX_PRICE_CENTS × MAX_LINE_QUANTITY × MAX_CART_LINES`) far inside i64,
/// so line and cart arithmetic cannot overflow.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
