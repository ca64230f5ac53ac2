//! Reconciliation stage: cross-check matched trades against the
//! counterparty source
//!
//! Three-tier policy: an exact counterpart reconciles; an order-side-only
//! mismatch is data-entry ambiguity flagged separately (deferred by
//! default); anything else is a genuine economic mismatch reported
//! against the first candidate row.

use crate::comparator::compare_price;
use crate::config::OrderTypeMismatch;
use crate::counterparty::CounterpartySource;
use trade_store::{StatusChange, StoreError, TradeRow};
use types::audit::DiscrepancyList;
use types::counterparty::CounterpartyRecord;
use types::status::TradeStatus;
use types::trade::Trade;

pub const NOT_FOUND: &str = "not found in counterparty source";
pub const ORDER_TYPE_ONLY: &str = "order-type-only mismatch, reconciliation deferred";
pub const AMBIGUOUS: &str = "multiple exact counterparty candidates";

/// Plan one reconciliation run over a snapshot of `MATCHED` and
/// `RECON_SKIPPED` rows (deferred trades are retried).
pub fn plan(
    rows: &[TradeRow],
    source: &dyn CounterpartySource,
    policy: OrderTypeMismatch,
) -> Result<Vec<StatusChange>, StoreError> {
    let mut changes = Vec::with_capacity(rows.len());

    for row in rows {
        let candidates = source.candidates(&row.trade.trade_id)?;
        changes.push(reconcile_one(row, &candidates, policy));
    }

    Ok(changes)
}

fn reconcile_one(
    row: &TradeRow,
    candidates: &[CounterpartyRecord],
    policy: OrderTypeMismatch,
) -> StatusChange {
    // Tier 1: nothing to compare against.
    if candidates.is_empty() {
        let mut discrepancies = DiscrepancyList::new();
        discrepancies.push(NOT_FOUND);
        return StatusChange::new(row.row_id, TradeStatus::ReconError, discrepancies);
    }

    // Tier 2: a single candidate agrees on every field.
    let exact = candidates
        .iter()
        .filter(|c| economic_fields_equal(&row.trade, c) && row.trade.side == c.side)
        .count();
    if exact == 1 {
        return StatusChange::new(row.row_id, TradeStatus::Reconciled, DiscrepancyList::new());
    }

    // Tier 3: a single candidate differs only in order side.
    let side_only = candidates
        .iter()
        .filter(|c| economic_fields_equal(&row.trade, c) && row.trade.side != c.side)
        .count();
    if exact == 0 && side_only == 1 {
        let mut discrepancies = DiscrepancyList::new();
        discrepancies.push(ORDER_TYPE_ONLY);
        let status = match policy {
            OrderTypeMismatch::Defer => TradeStatus::ReconSkipped,
            OrderTypeMismatch::Error => TradeStatus::ReconError,
        };
        return StatusChange::new(row.row_id, status, discrepancies);
    }

    // Tier 4: report field differences against the first candidate as a
    // representative reference.
    let mut discrepancies = diff_against(&row.trade, &candidates[0]);
    if discrepancies.is_empty() {
        // Several candidates agree exactly; the match is ambiguous, not
        // clean, and the audit entry must say why.
        discrepancies.push(AMBIGUOUS);
    }
    StatusChange::new(row.row_id, TradeStatus::ReconError, discrepancies)
}

/// Whether trade and candidate agree on ticker, quantity, price, and date.
fn economic_fields_equal(trade: &Trade, candidate: &CounterpartyRecord) -> bool {
    trade.ticker == candidate.ticker
        && trade.quantity == candidate.quantity
        && compare_price(trade.price, candidate.price).is_equal()
        && trade.trade_date == candidate.trade_date
}

/// Per-field mismatch descriptions against a reference candidate.
fn diff_against(trade: &Trade, reference: &CounterpartyRecord) -> DiscrepancyList {
    let mut discrepancies = DiscrepancyList::new();
    if trade.ticker != reference.ticker {
        discrepancies.push(format!(
            "Mismatch in ticker: trade='{}' vs counterparty='{}'",
            trade.ticker, reference.ticker
        ));
    }
    if trade.quantity != reference.quantity {
        discrepancies.push(format!(
            "Mismatch in quantity: trade='{}' vs counterparty='{}'",
            trade.quantity, reference.quantity
        ));
    }
    if !compare_price(trade.price, reference.price).is_equal() {
        discrepancies.push(format!(
            "Mismatch in price: trade='{}' vs counterparty='{}'",
            trade.price.normalize(),
            reference.price.normalize()
        ));
    }
    if trade.trade_date != reference.trade_date {
        discrepancies.push(format!(
            "Mismatch in date: trade='{}' vs counterparty='{}'",
            trade.trade_date, reference.trade_date
        ));
    }
    if trade.side != reference.side {
        discrepancies.push(format!(
            "Mismatch in order_type: trade='{}' vs counterparty='{}'",
            trade.side, reference.side
        ));
    }
    discrepancies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counterparty::MemoryCounterpartySource;
    use chrono::NaiveDate;
    use trade_store::RowId;
    use types::ids::{BrokerId, Ticker, TradeId};
    use types::trade::Side;

    fn matched_row(id: &str) -> TradeRow {
        let mut trade = Trade::new(
            TradeId::new(id),
            Ticker::new("AAPL"),
            100,
            "150.00".parse().unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            Side::BUY,
            BrokerId::new("B1"),
            BrokerId::new("B2"),
        );
        trade.status = TradeStatus::Matched;
        TradeRow {
            row_id: RowId(1),
            trade,
        }
    }

    fn candidate(id: &str) -> CounterpartyRecord {
        CounterpartyRecord::new(
            TradeId::new(id),
            Ticker::new("AAPL"),
            100,
            "150.00".parse().unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            Side::BUY,
        )
    }

    fn run_one(row: TradeRow, source: &MemoryCounterpartySource) -> StatusChange {
        let changes = plan(&[row], source, OrderTypeMismatch::Defer).unwrap();
        changes.into_iter().next().unwrap()
    }

    #[test]
    fn test_tier1_missing_counterpart() {
        let source = MemoryCounterpartySource::new();
        let change = run_one(matched_row("T-1"), &source);
        assert_eq!(change.new_status, TradeStatus::ReconError);
        assert!(change.discrepancies.contains(NOT_FOUND));
    }

    #[test]
    fn test_tier2_exact_match_reconciles_clean() {
        let mut source = MemoryCounterpartySource::new();
        source.add(candidate("T-1"));
        let change = run_one(matched_row("T-1"), &source);
        assert_eq!(change.new_status, TradeStatus::Reconciled);
        assert!(change.discrepancies.is_empty());
    }

    #[test]
    fn test_tier2_price_scale_differences_still_match() {
        let mut source = MemoryCounterpartySource::new();
        let mut c = candidate("T-1");
        c.price = "150.0000".parse().unwrap();
        source.add(c);
        let change = run_one(matched_row("T-1"), &source);
        assert_eq!(change.new_status, TradeStatus::Reconciled);
    }

    #[test]
    fn test_tier3_side_only_mismatch_defers() {
        let mut source = MemoryCounterpartySource::new();
        let mut c = candidate("T-1");
        c.side = Side::SELL;
        source.add(c);
        let change = run_one(matched_row("T-1"), &source);
        assert_eq!(change.new_status, TradeStatus::ReconSkipped);
        assert!(change.discrepancies.contains(ORDER_TYPE_ONLY));
    }

    #[test]
    fn test_tier3_error_policy() {
        let mut source = MemoryCounterpartySource::new();
        let mut c = candidate("T-1");
        c.side = Side::SELL;
        source.add(c);
        let changes = plan(&[matched_row("T-1")], &source, OrderTypeMismatch::Error).unwrap();
        assert_eq!(changes[0].new_status, TradeStatus::ReconError);
    }

    #[test]
    fn test_tier4_diffs_against_first_candidate() {
        let mut source = MemoryCounterpartySource::new();
        let mut c1 = candidate("T-1");
        c1.price = "151.00".parse().unwrap();
        c1.quantity = 90;
        source.add(c1);
        let mut c2 = candidate("T-1");
        c2.trade_date = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        source.add(c2);

        let change = run_one(matched_row("T-1"), &source);
        assert_eq!(change.new_status, TradeStatus::ReconError);
        assert!(change
            .discrepancies
            .contains("Mismatch in quantity: trade='100' vs counterparty='90'"));
        assert!(change
            .discrepancies
            .contains("Mismatch in price: trade='150' vs counterparty='151'"));
    }

    #[test]
    fn test_two_exact_candidates_fall_through_to_tier4() {
        let mut source = MemoryCounterpartySource::new();
        source.add(candidate("T-1"));
        source.add(candidate("T-1"));
        let change = run_one(matched_row("T-1"), &source);
        // Ambiguous duplicates are an error, not a silent reconcile.
        assert_eq!(change.new_status, TradeStatus::ReconError);
        assert!(change.discrepancies.contains(AMBIGUOUS));
    }
}
