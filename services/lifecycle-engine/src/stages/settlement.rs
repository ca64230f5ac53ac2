//! Settlement stage: finalize reconciled trade pairs
//!
//! A trade settles together with its contra-trade: same trade id,
//! broker ids mutually swapped, both legs reconciled. Imposing a total
//! order on broker ids and only processing the pair whose first leg has
//! the lesser broker id processes each unordered pair exactly once and
//! rules out self-pairing. Settlement is all-or-nothing for the pair;
//! the two legs never end in different statuses.

use crate::comparator::{check_positive_price, check_positive_quantity};
use crate::report::SettlementRecord;
use chrono::{DateTime, Utc};
use trade_store::{StatusChange, TradeRow};
use types::audit::DiscrepancyList;
use types::status::TradeStatus;

/// Plan one settlement run over a snapshot of `RECONCILED` rows.
///
/// Returns the planned transitions plus one export record per leg
/// processed. Rows with no reconciled counterpart in the snapshot are
/// left untouched for a later run.
pub fn plan(rows: &[TradeRow], now: DateTime<Utc>) -> (Vec<StatusChange>, Vec<SettlementRecord>) {
    let mut changes = Vec::new();
    let mut records = Vec::new();

    for leg_a in rows {
        let leg_b = rows.iter().find(|candidate| {
            candidate.trade.trade_id == leg_a.trade.trade_id
                && leg_a.trade.broker_id == candidate.trade.contra_broker_id
                && candidate.trade.broker_id == leg_a.trade.contra_broker_id
                && leg_a.trade.broker_id < candidate.trade.broker_id
        });
        let Some(leg_b) = leg_b else {
            continue;
        };

        let mut discrepancies = DiscrepancyList::new();
        for leg in [leg_a, leg_b] {
            for check in [
                check_positive_price(leg.trade.price),
                check_positive_quantity(leg.trade.quantity),
            ] {
                if let crate::comparator::CompareResult::Unequal(reason) = check {
                    // Both legs can fail the same check; the pair's list
                    // carries each reason once.
                    if !discrepancies.contains(&reason) {
                        discrepancies.push(reason);
                    }
                }
            }
        }

        let status = if discrepancies.is_empty() {
            TradeStatus::Settled
        } else {
            tracing::warn!(
                trade_id = %leg_a.trade.trade_id,
                discrepancies = %discrepancies,
                "settlement validation failed for pair"
            );
            TradeStatus::SettleError
        };
        let settled_at = (status == TradeStatus::Settled).then_some(now);

        for (leg, other) in [(leg_a, leg_b), (leg_b, leg_a)] {
            changes.push(StatusChange {
                row_id: leg.row_id,
                new_status: status,
                discrepancies: discrepancies.clone(),
                settled_at,
            });
            records.push(SettlementRecord {
                trade_id: leg.trade.trade_id.clone(),
                counterparty_trade_id: other.trade.trade_id.clone(),
                ticker: leg.trade.ticker.clone(),
                quantity: leg.trade.quantity,
                price: leg.trade.price,
                broker_id: leg.trade.broker_id.clone(),
                contra_broker_id: leg.trade.contra_broker_id.clone(),
                status,
                discrepancies: discrepancies.clone(),
                settled_at,
            });
        }
    }

    (changes, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use trade_store::RowId;
    use types::ids::{BrokerId, Ticker, TradeId};
    use types::trade::{Side, Trade};

    fn leg(row_id: u64, id: &str, side: Side, broker: &str, contra: &str, qty: i64) -> TradeRow {
        let mut trade = Trade::new(
            TradeId::new(id),
            Ticker::new("AAPL"),
            qty,
            "150.00".parse().unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            side,
            BrokerId::new(broker),
            BrokerId::new(contra),
        );
        trade.status = TradeStatus::Reconciled;
        TradeRow {
            row_id: RowId(row_id),
            trade,
        }
    }

    fn pair(qty_a: i64, qty_b: i64) -> Vec<TradeRow> {
        vec![
            leg(1, "T-1", Side::BUY, "B1", "B2", qty_a),
            leg(2, "T-1", Side::SELL, "B2", "B1", qty_b),
        ]
    }

    #[test]
    fn test_clean_pair_settles_with_timestamp() {
        let now = Utc::now();
        let (changes, records) = plan(&pair(10, 10), now);

        assert_eq!(changes.len(), 2);
        for change in &changes {
            assert_eq!(change.new_status, TradeStatus::Settled);
            assert_eq!(change.settled_at, Some(now));
            assert!(change.discrepancies.is_empty());
        }
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.status == TradeStatus::Settled));
    }

    #[test]
    fn test_pair_processed_exactly_once() {
        let (changes, records) = plan(&pair(10, 10), Utc::now());
        // Two legs, one pair: two changes and two records, not four.
        assert_eq!(changes.len(), 2);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_zero_quantity_on_one_leg_fails_both() {
        let (changes, _) = plan(&pair(10, 0), Utc::now());
        assert_eq!(changes.len(), 2);
        for change in &changes {
            assert_eq!(change.new_status, TradeStatus::SettleError);
            assert!(change
                .discrepancies
                .contains("invalid quantity (must be positive)"));
            assert!(change.settled_at.is_none());
        }
    }

    #[test]
    fn test_non_positive_price_fails_pair() {
        let mut rows = pair(10, 10);
        rows[0].trade.price = "0".parse().unwrap();
        let (changes, _) = plan(&rows, Utc::now());
        for change in &changes {
            assert_eq!(change.new_status, TradeStatus::SettleError);
            assert!(change
                .discrepancies
                .contains("invalid price (must be positive)"));
        }
    }

    #[test]
    fn test_legs_always_share_status() {
        for (qa, qb) in [(10, 10), (0, 10), (10, 0), (0, 0)] {
            let (changes, _) = plan(&pair(qa, qb), Utc::now());
            assert_eq!(changes.len(), 2);
            assert_eq!(changes[0].new_status, changes[1].new_status);
        }
    }

    #[test]
    fn test_unpaired_leg_left_untouched() {
        let rows = vec![leg(1, "T-1", Side::BUY, "B1", "B2", 10)];
        let (changes, records) = plan(&rows, Utc::now());
        assert!(changes.is_empty());
        assert!(records.is_empty());
    }

    #[test]
    fn test_same_broker_never_self_pairs() {
        let rows = vec![
            leg(1, "T-1", Side::BUY, "B1", "B1", 10),
            leg(2, "T-1", Side::SELL, "B1", "B1", 10),
        ];
        let (changes, _) = plan(&rows, Utc::now());
        assert!(changes.is_empty());
    }

    #[test]
    fn test_export_record_references_counterparty_leg() {
        let (_, records) = plan(&pair(10, 10), Utc::now());
        assert_eq!(records[0].counterparty_trade_id, records[1].trade_id);
        assert_eq!(records[0].broker_id, records[1].contra_broker_id);
    }
}
