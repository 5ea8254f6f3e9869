//! # Refund Planning
//!
//! The pure half of refund processing: given a sale's frozen line snapshot,
//! the quantities already refunded per line, and the operator's requested
//! quantities, produce an itemized [`RefundPlan`] or reject the selection.
//!
//! ## Two-Phase Refund
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Refund Processing                                 │
//! │                                                                         │
//! │  1. LOOKUP (db)      sale by transaction id + refunded-so-far per line │
//! │                                 │                                       │
//! │  2. PLAN (THIS MODULE)          ▼                                       │
//! │     per line: 0 ≤ qty ≤ purchased − already refunded                   │
//! │     amount  = Σ sale-time unit price × qty                             │
//! │     zero-qty lines contribute nothing and restock nothing              │
//! │                                 │                                       │
//! │  3. CONFIRM (operator)          ▼                                       │
//! │     the plan IS the confirmation gate: the register shows the          │
//! │     itemized breakdown and total before anything commits               │
//! │                                 │                                       │
//! │  4. COMMIT (db)                 ▼                                       │
//! │     one transaction: refund record + lines + restock by item id        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bounds are cumulative across refund events: a second refund against the
//! same sale only sees what is still refundable. Violations are rejected,
//! never clamped.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::LineItem;

// =============================================================================
// Refund Plan
// =============================================================================

/// One line of a planned refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundLinePlan {
    /// Position of the line within the sale snapshot. Together with the sale
    /// id this keys the cumulative refunded quantity.
    pub line_index: usize,

    /// Catalog item to restock (stable sale-time reference).
    pub item_id: i64,

    /// Item name at sale time, for the confirmation display.
    pub name: String,

    /// Sale-time unit price in centavos.
    pub unit_price_cents: i64,

    /// Units being returned. Always >= 1 (zero-quantity lines are dropped).
    pub quantity: i64,

    /// unit_price × quantity for this line.
    pub amount_cents: i64,
}

/// A validated, itemized refund awaiting operator confirmation.
///
/// The plan is what the register shows the manager before commit; committing
/// consumes it, so another refund requires a fresh lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundPlan {
    /// The sale being refunded against.
    pub sale_id: i64,

    /// Total amount to return, at sale-time prices.
    pub refund_amount_cents: i64,

    /// The non-zero lines, in sale order.
    pub lines: Vec<RefundLinePlan>,
}

impl RefundPlan {
    /// The refund total as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.refund_amount_cents)
    }
}

// =============================================================================
// Planning
// =============================================================================

/// Plans a partial refund against a sale's line snapshot.
///
/// ## Arguments
/// * `sale_id` - The transaction being refunded
/// * `lines` - The sale's frozen line items, in order
/// * `already_refunded` - Cumulative refunded quantity per line, same order
/// * `requested` - Requested refund quantity per line, same order
///
/// ## Errors
/// * `LineMismatch` - the slices don't line up with the sale
/// * `RefundExceedsPurchase` - a request exceeds what is still refundable
/// * `NothingToRefund` - every requested quantity is zero
pub fn plan_refund(
    sale_id: i64,
    lines: &[LineItem],
    already_refunded: &[i64],
    requested: &[i64],
) -> CoreResult<RefundPlan> {
    if requested.len() != lines.len() || already_refunded.len() != lines.len() {
        return Err(CoreError::LineMismatch {
            given: requested.len().min(already_refunded.len()),
            expected: lines.len(),
        });
    }

    let mut plan_lines = Vec::new();
    let mut total = Money::zero();

    for (idx, line) in lines.iter().enumerate() {
        let qty = requested[idx];
        let refunded = already_refunded[idx];
        let refundable = line.quantity - refunded;

        if qty < 0 || qty > refundable {
            return Err(CoreError::RefundExceedsPurchase {
                name: line.name.clone(),
                requested: qty,
                purchased: line.quantity,
                already_refunded: refunded,
                refundable: refundable.max(0),
            });
        }

        // Zero-quantity lines contribute nothing and trigger no restock
        if qty == 0 {
            continue;
        }

        let amount = line.unit_price().multiply_quantity(qty);
        total += amount;

        plan_lines.push(RefundLinePlan {
            line_index: idx,
            item_id: line.item_id,
            name: line.name.clone(),
            unit_price_cents: line.unit_price_cents,
            quantity: qty,
            amount_cents: amount.cents(),
        });
    }

    if plan_lines.is_empty() {
        return Err(CoreError::NothingToRefund);
    }

    Ok(RefundPlan {
        sale_id,
        refund_amount_cents: total.cents(),
        lines: plan_lines,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// The canonical sale: 3 × Coke ₱20 + 2 × Chips ₱35.
    fn scenario_lines() -> Vec<LineItem> {
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

    #[test]
    fn test_partial_refund_amount() {
        // Refund 2 of the 3 Cokes: 2 × ₱20 = ₱40
        let lines = scenario_lines();
        let plan = plan_refund(7, &lines, &[0, 0], &[2, 0]).unwrap();

        assert_eq!(plan.sale_id, 7);
        assert_eq!(plan.refund_amount_cents, 4000);
        assert_eq!(plan.lines.len(), 1); // zero-qty Chips line excluded
        assert_eq!(plan.lines[0].line_index, 0);
        assert_eq!(plan.lines[0].quantity, 2);
    }

    #[test]
    fn test_multi_line_refund_is_additive() {
        let lines = scenario_lines();
        let plan = plan_refund(7, &lines, &[0, 0], &[1, 2]).unwrap();

        // 1 × ₱20 + 2 × ₱35 = ₱90
        assert_eq!(plan.refund_amount_cents, 9000);
        assert_eq!(plan.lines.len(), 2);
        let sum: i64 = plan.lines.iter().map(|l| l.amount_cents).sum();
        assert_eq!(sum, plan.refund_amount_cents);
    }

    #[test]
    fn test_sale_time_price_used_not_catalog_price() {
        // The snapshot price is all the planner ever sees; there is no way
        // to even pass a current catalog price in.
        let mut lines = scenario_lines();
        lines[0].unit_price_cents = 1500; // sale happened at an old price

        let plan = plan_refund(7, &lines, &[0, 0], &[2, 0]).unwrap();
        assert_eq!(plan.refund_amount_cents, 3000);
    }

    #[test]
    fn test_over_refund_rejected_not_clamped() {
        let lines = scenario_lines();
        let err = plan_refund(7, &lines, &[0, 0], &[4, 0]).unwrap_err();

        match err {
            CoreError::RefundExceedsPurchase {
                requested,
                purchased,
                refundable,
                ..
            } => {
                assert_eq!(requested, 4);
                assert_eq!(purchased, 3);
                assert_eq!(refundable, 3);
            }
            other => panic!("expected RefundExceedsPurchase, got {other:?}"),
        }
    }

    #[test]
    fn test_cumulative_bound_across_refund_events() {
        let lines = scenario_lines();

        // 2 Cokes already refunded earlier; only 1 remains refundable
        let err = plan_refund(7, &lines, &[2, 0], &[2, 0]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::RefundExceedsPurchase {
                already_refunded: 2,
                refundable: 1,
                ..
            }
        ));

        // The remaining unit is still refundable
        let plan = plan_refund(7, &lines, &[2, 0], &[1, 0]).unwrap();
        assert_eq!(plan.refund_amount_cents, 2000);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let lines = scenario_lines();
        assert!(plan_refund(7, &lines, &[0, 0], &[-1, 0]).is_err());
    }

    #[test]
    fn test_all_zero_selection_rejected() {
        let lines = scenario_lines();
        let err = plan_refund(7, &lines, &[0, 0], &[0, 0]).unwrap_err();
        assert!(matches!(err, CoreError::NothingToRefund));
    }

    #[test]
    fn test_line_mismatch() {
        let lines = scenario_lines();
        let err = plan_refund(7, &lines, &[0, 0], &[1]).unwrap_err();
        assert!(matches!(err, CoreError::LineMismatch { expected: 2, .. }));
    }
}
