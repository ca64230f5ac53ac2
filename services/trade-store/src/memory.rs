//! In-memory reference implementation of the trade store
//!
//! Atomicity is validate-then-apply: a batch is checked in full against
//! the transition table before any row is touched, so a rejected commit
//! leaves rows and audit log exactly as they were.

use crate::store::{RowId, StoreError, TradeRow, TradeStore, TransitionBatch};
use std::collections::{BTreeMap, HashSet};
use types::audit::AuditLogEntry;
use types::status::TradeStatus;
use types::trade::Trade;

/// In-memory trade store backed by a row map and an append-only audit
/// vector.
#[derive(Debug, Default)]
pub struct MemoryTradeStore {
    rows: BTreeMap<RowId, Trade>,
    audit: Vec<AuditLogEntry>,
    next_row: u64,
}

impl MemoryTradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trade rows held.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Read a single row (test and report convenience).
    pub fn get(&self, row_id: RowId) -> Option<TradeRow> {
        self.rows.get(&row_id).map(|trade| TradeRow {
            row_id,
            trade: trade.clone(),
        })
    }

    fn snapshot<F>(&self, mut filter: F) -> Vec<TradeRow>
    where
        F: FnMut(&Trade) -> bool,
    {
        let mut rows: Vec<TradeRow> = self
            .rows
            .iter()
            .filter(|(_, trade)| filter(trade))
            .map(|(row_id, trade)| TradeRow {
                row_id: *row_id,
                trade: trade.clone(),
            })
            .collect();
        // Deterministic stage input order: by identifier, then side.
        rows.sort_by(|a, b| {
            (&a.trade.trade_id, a.trade.side).cmp(&(&b.trade.trade_id, b.trade.side))
        });
        rows
    }
}

impl TradeStore for MemoryTradeStore {
    fn fetch_by_status(&self, status: TradeStatus) -> Result<Vec<TradeRow>, StoreError> {
        Ok(self.snapshot(|trade| trade.status == status))
    }

    fn fetch_by_statuses(&self, statuses: &[TradeStatus]) -> Result<Vec<TradeRow>, StoreError> {
        Ok(self.snapshot(|trade| statuses.contains(&trade.status)))
    }

    fn insert(&mut self, trade: Trade) -> Result<RowId, StoreError> {
        let duplicate = self
            .rows
            .values()
            .any(|t| t.trade_id == trade.trade_id && t.side == trade.side);
        if duplicate {
            return Err(StoreError::DuplicateRow {
                trade_id: trade.trade_id.to_string(),
                side: trade.side.to_string(),
            });
        }
        self.next_row += 1;
        let row_id = RowId(self.next_row);
        self.rows.insert(row_id, trade);
        Ok(row_id)
    }

    fn commit(&mut self, batch: TransitionBatch) -> Result<Vec<AuditLogEntry>, StoreError> {
        // Validate everything before mutating anything.
        let mut seen = HashSet::new();
        for change in &batch.changes {
            if !seen.insert(change.row_id) {
                return Err(StoreError::DuplicateChange {
                    row_id: change.row_id,
                });
            }
            let trade = self
                .rows
                .get(&change.row_id)
                .ok_or(StoreError::RowNotFound {
                    row_id: change.row_id,
                })?;
            if !trade.status.can_transition_to(change.new_status) {
                return Err(StoreError::InvalidTransition {
                    row_id: change.row_id,
                    from: trade.status,
                    to: change.new_status,
                });
            }
        }

        // Apply: row update and audit entry as one unit per change.
        let mut entries = Vec::with_capacity(batch.changes.len());
        for change in batch.changes {
            let trade = self
                .rows
                .get_mut(&change.row_id)
                .expect("validated above");
            trade.status = change.new_status;
            if let Some(at) = change.settled_at {
                trade.settled_at = Some(at);
            }
            let entry = AuditLogEntry::new(
                trade.trade_id.clone(),
                batch.stage,
                change.new_status,
                change.discrepancies,
                batch.recorded_at,
            );
            self.audit.push(entry.clone());
            entries.push(entry);
        }

        tracing::debug!(
            stage = %batch.stage,
            transitions = entries.len(),
            "committed transition batch"
        );
        Ok(entries)
    }

    fn audit_log(&self) -> Result<Vec<AuditLogEntry>, StoreError> {
        Ok(self.audit.clone())
    }
}
