//! Run reports, export records, and the exception filter

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trade_store::StatusChange;
use types::audit::{AuditLogEntry, DiscrepancyList, Stage};
use types::ids::{BrokerId, Ticker, TradeId};
use types::status::TradeStatus;

/// Structured outcome of one stage run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: Stage,
    /// Trades in the stage's snapshot
    pub processed: usize,
    /// Clean forward transitions (matched/unmatched/reconciled/settled)
    pub clean: usize,
    /// Transitions into an error status
    pub errored: usize,
    /// Deferrals (`RECON_SKIPPED`)
    pub deferred: usize,
}

impl StageReport {
    /// Tally a planned batch into a report.
    pub fn tally(stage: Stage, processed: usize, changes: &[StatusChange]) -> Self {
        let mut report = Self {
            stage,
            processed,
            clean: 0,
            errored: 0,
            deferred: 0,
        };
        for change in changes {
            match change.new_status {
                TradeStatus::Unmatched
                | TradeStatus::Matched
                | TradeStatus::Reconciled
                | TradeStatus::Settled => report.clean += 1,
                TradeStatus::ReconSkipped => report.deferred += 1,
                TradeStatus::VerifyError
                | TradeStatus::MatchError
                | TradeStatus::UnmatchedFinal
                | TradeStatus::ReconError
                | TradeStatus::SettleError => report.errored += 1,
                TradeStatus::Unverified => {}
            }
        }
        report
    }
}

/// One export record per settlement leg, handed to the result sink for
/// downstream archival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub trade_id: TradeId,
    pub counterparty_trade_id: TradeId,
    pub ticker: Ticker,
    pub quantity: i64,
    pub price: Decimal,
    pub broker_id: BrokerId,
    pub contra_broker_id: BrokerId,
    pub status: TradeStatus,
    pub discrepancies: DiscrepancyList,
    pub settled_at: Option<DateTime<Utc>>,
}

/// Outcome of a full orchestrated run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub stages: Vec<StageReport>,
    /// Settlement batch for the result export sink
    pub export: Vec<SettlementRecord>,
    /// Audit entries with non-empty discrepancies, for the notification
    /// sink
    pub exceptions: Vec<AuditLogEntry>,
}

/// Filter the entries whose discrepancy list is non-empty. The core only
/// produces the list; sending notifications is the caller's concern.
pub fn exceptions(entries: &[AuditLogEntry]) -> Vec<AuditLogEntry> {
    entries
        .iter()
        .filter(|e| e.is_exception())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trade_store::RowId;

    #[test]
    fn test_tally_classifies_statuses() {
        let changes = vec![
            StatusChange::new(RowId(1), TradeStatus::Matched, DiscrepancyList::new()),
            StatusChange::new(RowId(2), TradeStatus::Matched, DiscrepancyList::new()),
            StatusChange::new(RowId(3), TradeStatus::MatchError, DiscrepancyList::new()),
            StatusChange::new(RowId(4), TradeStatus::UnmatchedFinal, DiscrepancyList::new()),
        ];
        let report = StageReport::tally(Stage::Matching, 4, &changes);
        assert_eq!(report.processed, 4);
        assert_eq!(report.clean, 2);
        assert_eq!(report.errored, 2);
        assert_eq!(report.deferred, 0);
    }

    #[test]
    fn test_tally_counts_deferrals() {
        let changes = vec![StatusChange::new(
            RowId(1),
            TradeStatus::ReconSkipped,
            DiscrepancyList::new(),
        )];
        let report = StageReport::tally(Stage::Reconciliation, 1, &changes);
        assert_eq!(report.deferred, 1);
    }

    #[test]
    fn test_exception_filter() {
        let clean = AuditLogEntry::new(
            TradeId::new("T-1"),
            Stage::Matching,
            TradeStatus::Matched,
            DiscrepancyList::new(),
            Utc::now(),
        );
        let mut d = DiscrepancyList::new();
        d.push("price mismatch");
        let dirty = AuditLogEntry::new(
            TradeId::new("T-2"),
            Stage::Matching,
            TradeStatus::MatchError,
            d,
            Utc::now(),
        );

        let filtered = exceptions(&[clean, dirty.clone()]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].trade_id, dirty.trade_id);
    }
}
