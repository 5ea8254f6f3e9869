//! # Error Types
//!
//! Domain-specific error types for sari-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sari-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  sari-db errors (separate crate)                                       │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── ServiceError     - Checkout/refund orchestration failures         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → operator message   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, amounts, bounds)
//! 3. Errors are enum variants, never String
//! 4. No automatic retries anywhere: every failure is terminal for the
//!    current operator action

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are surfaced to the
/// operator, who re-initiates the operation explicitly; nothing is retried.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout attempted on an empty cart. Caught before any verification
    /// or persistence work happens.
    #[error("Cart is empty")]
    EmptyCart,

    /// Insufficient stock to complete a sale or stock adjustment.
    ///
    /// ## When This Occurs
    /// - A cart line asks for more units than are on the shelf
    /// - A manual stock adjustment would drive the count negative
    ///
    /// The whole operation aborts before any mutation; stock is never
    /// partially decremented.
    #[error("Insufficient stock for '{name}': available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Cash tendered below the amount due.
    ///
    /// ## User Workflow
    /// ```text
    /// Tender: Cash ₱100.00, due ₱130.00
    ///      │
    ///      ▼
    /// InsufficientPayment { shortfall_cents: 3000 }
    ///      │
    ///      ▼
    /// Register shows: "Short ₱30.00" - cashier re-enters and retries
    /// ```
    #[error("Cash tendered is short by {} centavos", shortfall_cents)]
    InsufficientPayment { shortfall_cents: i64 },

    /// A refund line asked for more units than remain refundable.
    ///
    /// The bound is cumulative across refund events:
    /// `requested ≤ purchased − already refunded`. Violations are rejected,
    /// never clamped.
    #[error(
        "Refund quantity {requested} for '{name}' exceeds refundable {refundable} \
         (purchased {purchased}, already refunded {already_refunded})"
    )]
    RefundExceedsPurchase {
        name: String,
        requested: i64,
        purchased: i64,
        already_refunded: i64,
        refundable: i64,
    },

    /// Every selected refund quantity was zero.
    #[error("No items selected for refund")]
    NothingToRefund,

    /// The refund quantity list does not line up with the sale's lines.
    #[error("Refund selection has {given} entries but the sale has {expected} lines")]
    LineMismatch { given: usize, expected: usize },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable number or date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate item name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Coke".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for 'Coke': available 3, requested 5"
        );

        let err = CoreError::InsufficientPayment {
            shortfall_cents: 3000,
        };
        assert!(err.to_string().contains("3000"));
    }

    #[test]
    fn test_refund_bound_message_carries_context() {
        let err = CoreError::RefundExceedsPurchase {
            name: "Coke".to_string(),
            requested: 3,
            purchased: 3,
            already_refunded: 2,
            refundable: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("Coke"));
        assert!(msg.contains("refundable 1"));
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
