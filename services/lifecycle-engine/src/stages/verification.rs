//! Verification stage: validate trades against static/reference rule data
//!
//! Checks run independently and accumulate — one run reports every
//! defect a trade has. Discrepancy wording matches the upstream
//! verification contract.
//!
//! Broker checks have inverted polarity, preserved verbatim: a broker id
//! present in the configured list fails the trade.

use crate::comparator::compare_price_with_reference;
use trade_store::{StatusChange, TradeRow};
use types::audit::DiscrepancyList;
use types::rules::RuleSet;
use types::status::TradeStatus;
use types::trade::Trade;

pub const INVALID_INSTRUMENT: &str = "Invalid instrument";
pub const INVALID_BROKER: &str = "Invalid broker_id";
pub const INVALID_CONTRA_BROKER: &str = "Invalid contra_broker_id";
pub const REFERENCE_PRICE_MISSING: &str = "Reference price not found";
pub const INVALID_ORDER_TYPE: &str = "Invalid order_type";
pub const HOLIDAY_DATE: &str = "Trade date falls on a holiday";

/// Plan one verification run over a snapshot of `UNVERIFIED` rows.
///
/// The caller validates the rule set before planning; broken rule data
/// aborts the run before any trade is examined.
pub fn plan(rules: &RuleSet, rows: &[TradeRow]) -> Vec<StatusChange> {
    rows.iter()
        .map(|row| {
            let discrepancies = validate_trade(rules, &row.trade);
            let status = if discrepancies.is_empty() {
                TradeStatus::Unmatched
            } else {
                TradeStatus::VerifyError
            };
            StatusChange::new(row.row_id, status, discrepancies)
        })
        .collect()
}

/// Evaluate every rule against one trade, accumulating all failures.
fn validate_trade(rules: &RuleSet, trade: &Trade) -> DiscrepancyList {
    let mut discrepancies = DiscrepancyList::new();

    if !rules.is_known_instrument(&trade.ticker) {
        discrepancies.push(INVALID_INSTRUMENT);
    }

    // Inverted polarity: membership in the list fails the check.
    if rules.disapproved_brokers.contains(&trade.broker_id) {
        discrepancies.push(INVALID_BROKER);
    }
    if rules
        .disapproved_contra_brokers
        .contains(&trade.contra_broker_id)
    {
        discrepancies.push(INVALID_CONTRA_BROKER);
    }

    if rules.price_validation.enabled {
        match rules.reference_price(&trade.ticker) {
            Some(reference) => {
                compare_price_with_reference(trade.price, reference, rules.deviation_pct)
                    .record(&mut discrepancies);
            }
            None => discrepancies.push(REFERENCE_PRICE_MISSING),
        }
    }

    if !rules.valid_sides.contains(&trade.side) {
        discrepancies.push(INVALID_ORDER_TYPE);
    }

    if rules.holidays.contains(&trade.trade_date) {
        discrepancies.push(HOLIDAY_DATE);
    }

    discrepancies
}
