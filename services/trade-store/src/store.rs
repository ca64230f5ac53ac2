//! Store trait and transition batch types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use types::audit::{AuditLogEntry, DiscrepancyList, Stage};
use types::status::TradeStatus;
use types::trade::Trade;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Row not found: {row_id}")]
    RowNotFound { row_id: RowId },

    #[error("Duplicate row key: trade {trade_id} side {side}")]
    DuplicateRow { trade_id: String, side: String },

    #[error("Illegal transition for row {row_id}: {from} -> {to}")]
    InvalidTransition {
        row_id: RowId,
        from: TradeStatus,
        to: TradeStatus,
    },

    #[error("Row {row_id} changed in duplicate within one batch")]
    DuplicateChange { row_id: RowId },

    #[error("Store backend failure: {0}")]
    Backend(String),
}

// ── Rows ────────────────────────────────────────────────────────────

/// Internal row key assigned by the store on insert (the auto-increment
/// primary key of the backing table).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trade row as fetched from the store: the trade plus its row key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRow {
    pub row_id: RowId,
    pub trade: Trade,
}

// ── Transition batches ──────────────────────────────────────────────

/// One planned status change, paired with the discrepancies the stage
/// found. The store derives the audit entry from this so the pairing
/// invariant cannot be violated by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub row_id: RowId,
    pub new_status: TradeStatus,
    pub discrepancies: DiscrepancyList,
    /// Set only when `new_status` is `Settled`
    pub settled_at: Option<DateTime<Utc>>,
}

impl StatusChange {
    pub fn new(row_id: RowId, new_status: TradeStatus, discrepancies: DiscrepancyList) -> Self {
        Self {
            row_id,
            new_status,
            discrepancies,
            settled_at: None,
        }
    }

    pub fn settled(row_id: RowId, at: DateTime<Utc>) -> Self {
        Self {
            row_id,
            new_status: TradeStatus::Settled,
            discrepancies: DiscrepancyList::new(),
            settled_at: Some(at),
        }
    }
}

/// All transitions produced by one stage run, committed atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionBatch {
    pub stage: Stage,
    /// Shared timestamp for every audit entry in the batch
    pub recorded_at: DateTime<Utc>,
    pub changes: Vec<StatusChange>,
}

impl TransitionBatch {
    pub fn new(stage: Stage, recorded_at: DateTime<Utc>) -> Self {
        Self {
            stage,
            recorded_at,
            changes: Vec::new(),
        }
    }

    pub fn push(&mut self, change: StatusChange) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

// ── Store trait ─────────────────────────────────────────────────────

/// Typed access to trade rows and the audit log.
///
/// `&mut self` on `commit` is the run-level mutual exclusion the
/// lifecycle relies on: stages run as non-overlapping batch jobs, never
/// concurrently over the same rows.
pub trait TradeStore {
    /// Snapshot of all rows currently in `status`, ordered by
    /// `(trade_id, side)` for deterministic stage runs.
    fn fetch_by_status(&self, status: TradeStatus) -> Result<Vec<TradeRow>, StoreError>;

    /// Snapshot across several statuses (reconciliation declares a
    /// two-status precondition), same ordering.
    fn fetch_by_statuses(&self, statuses: &[TradeStatus]) -> Result<Vec<TradeRow>, StoreError>;

    /// Ingestion boundary: add a row, returning its assigned key.
    /// Rejects a duplicate `(trade_id, side)` pair.
    fn insert(&mut self, trade: Trade) -> Result<RowId, StoreError>;

    /// Apply a transition batch atomically: every status change plus its
    /// derived audit entry, or nothing at all. Validates row existence,
    /// the transition table, and per-batch change uniqueness before any
    /// mutation.
    fn commit(&mut self, batch: TransitionBatch) -> Result<Vec<AuditLogEntry>, StoreError>;

    /// The full append-only audit log, oldest first.
    fn audit_log(&self) -> Result<Vec<AuditLogEntry>, StoreError>;
}
