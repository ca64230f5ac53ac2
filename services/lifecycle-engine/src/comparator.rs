//! Field-level comparison rules shared by matching, reconciliation, and
//! settlement validation
//!
//! All comparisons are pure. Stages accumulate every `Unequal` result
//! into a discrepancy list instead of stopping at the first mismatch, so
//! a single transition reports every defect found.

use rust_decimal::Decimal;
use std::fmt::Display;
use types::audit::DiscrepancyList;

/// Outcome of comparing one field between two records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareResult {
    Equal,
    Unequal(String),
}

impl CompareResult {
    pub fn is_equal(&self) -> bool {
        matches!(self, CompareResult::Equal)
    }

    /// Record an unequal result into `list`; equal results are silent.
    pub fn record(self, list: &mut DiscrepancyList) {
        if let CompareResult::Unequal(reason) = self {
            list.push(reason);
        }
    }
}

/// Exact equality for strings, enums, identifiers, and dates.
pub fn compare_exact<T: PartialEq + Display>(field: &str, ours: &T, theirs: &T) -> CompareResult {
    if ours == theirs {
        CompareResult::Equal
    } else {
        CompareResult::Unequal(format!("{field} mismatch"))
    }
}

/// Decimal price equality on normalized values.
///
/// Normalization strips trailing zeros so `50.00` equals `50.0000`;
/// textual comparison would treat differing precision as a mismatch.
pub fn compare_price(ours: Decimal, theirs: Decimal) -> CompareResult {
    if ours.normalize() == theirs.normalize() {
        CompareResult::Equal
    } else {
        CompareResult::Unequal("price mismatch".to_string())
    }
}

/// Reference-price mode: accept when
/// `|price - reference| <= reference * deviation_pct / 100`.
pub fn compare_price_with_reference(
    price: Decimal,
    reference: Decimal,
    deviation_pct: Decimal,
) -> CompareResult {
    let allowed = reference * deviation_pct / Decimal::ONE_HUNDRED;
    if (price - reference).abs() <= allowed {
        CompareResult::Equal
    } else {
        CompareResult::Unequal("Price out of allowed range".to_string())
    }
}

/// Integer quantity equality.
pub fn compare_quantity(ours: i64, theirs: i64) -> CompareResult {
    if ours == theirs {
        CompareResult::Equal
    } else {
        CompareResult::Unequal("quantity mismatch".to_string())
    }
}

/// Standalone settlement-readiness check: quantity must be positive,
/// independent of any counterpart comparison.
pub fn check_positive_quantity(quantity: i64) -> CompareResult {
    if quantity > 0 {
        CompareResult::Equal
    } else {
        CompareResult::Unequal("invalid quantity (must be positive)".to_string())
    }
}

/// Standalone settlement-readiness check: price must be positive.
pub fn check_positive_price(price: Decimal) -> CompareResult {
    if price > Decimal::ZERO {
        CompareResult::Equal
    } else {
        CompareResult::Unequal("invalid price (must be positive)".to_string())
    }
}
