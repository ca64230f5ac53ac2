//! Matching stage: pair unmatched trades into counter-trades
//!
//! Pairing is quadratic over the candidate set, which is bounded to
//! currently-unmatched trades per run. An index on
//! (ticker, quantity, date) would replace the scan if volume grows.

use crate::comparator::{compare_exact, compare_price, compare_quantity};
use std::collections::HashSet;
use trade_store::{RowId, StatusChange, TradeRow};
use types::audit::DiscrepancyList;
use types::status::TradeStatus;

pub const NO_COUNTERPART: &str = "no counterpart found";

/// Plan one matching run over a snapshot of `UNMATCHED` rows.
///
/// Rows must arrive in the store's deterministic order; the first
/// not-yet-consumed counterpart after a trade wins. A paired row never
/// participates in a second pair within the run, and both members of a
/// pair always receive the same resulting status.
pub fn plan(rows: &[TradeRow]) -> Vec<StatusChange> {
    let mut consumed: HashSet<RowId> = HashSet::new();
    let mut changes = Vec::new();

    for (i, r1) in rows.iter().enumerate() {
        if consumed.contains(&r1.row_id) {
            continue;
        }

        let counterpart = rows[i + 1..]
            .iter()
            .find(|r2| !consumed.contains(&r2.row_id) && r1.trade.is_counterpart_of(&r2.trade));

        match counterpart {
            Some(r2) => {
                // Claim both members before anything else can pair with
                // either.
                consumed.insert(r1.row_id);
                consumed.insert(r2.row_id);

                let mut discrepancies = DiscrepancyList::new();
                compare_exact("ticker", &r1.trade.ticker, &r2.trade.ticker)
                    .record(&mut discrepancies);
                compare_price(r1.trade.price, r2.trade.price).record(&mut discrepancies);
                compare_quantity(r1.trade.quantity, r2.trade.quantity)
                    .record(&mut discrepancies);
                compare_exact("date", &r1.trade.trade_date, &r2.trade.trade_date)
                    .record(&mut discrepancies);

                let status = if discrepancies.is_empty() {
                    TradeStatus::Matched
                } else {
                    tracing::warn!(
                        trade_id = %r1.trade.trade_id,
                        counterpart = %r2.trade.trade_id,
                        discrepancies = %discrepancies,
                        "counter-trade pair disagrees"
                    );
                    TradeStatus::MatchError
                };

                changes.push(StatusChange::new(r1.row_id, status, discrepancies.clone()));
                changes.push(StatusChange::new(r2.row_id, status, discrepancies));
            }
            None => {
                consumed.insert(r1.row_id);
                let mut discrepancies = DiscrepancyList::new();
                discrepancies.push(NO_COUNTERPART);
                changes.push(StatusChange::new(
                    r1.row_id,
                    TradeStatus::UnmatchedFinal,
                    discrepancies,
                ));
            }
        }
    }

    changes
}
