//! Audit log entries and discrepancy lists
//!
//! Every status transition writes exactly one audit entry in the same
//! atomic commit. Entries are append-only and never mutated or deleted.

use crate::ids::TradeId;
use crate::status::TradeStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle stage names as recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Verification,
    Matching,
    Reconciliation,
    Settlement,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Verification => "VERIFICATION",
            Stage::Matching => "MATCHING",
            Stage::Reconciliation => "RECONCILIATION",
            Stage::Settlement => "SETTLEMENT",
        };
        write!(f, "{}", s)
    }
}

/// Ordered list of human-readable discrepancy descriptions attached to a
/// transition. Empty exactly when the transition is a clean success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscrepancyList(Vec<String>);

impl DiscrepancyList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, reason: impl Into<String>) {
        self.0.push(reason.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Append every discrepancy from `other`, preserving order.
    pub fn extend(&mut self, other: DiscrepancyList) {
        self.0.extend(other.0);
    }

    pub fn contains(&self, reason: &str) -> bool {
        self.0.iter().any(|r| r == reason)
    }
}

impl From<Vec<String>> for DiscrepancyList {
    fn from(v: Vec<String>) -> Self {
        Self(v)
    }
}

// Joined with "; " for log lines and notification bodies.
impl fmt::Display for DiscrepancyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("; "))
    }
}

/// Immutable audit record: one per status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// UUID v7: time-sortable, so the log reads chronologically
    pub entry_id: Uuid,
    pub trade_id: TradeId,
    pub stage: Stage,
    /// Status the trade transitioned to
    pub status: TradeStatus,
    pub discrepancies: DiscrepancyList,
    pub recorded_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(
        trade_id: TradeId,
        stage: Stage,
        status: TradeStatus,
        discrepancies: DiscrepancyList,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            entry_id: Uuid::now_v7(),
            trade_id,
            stage,
            status,
            discrepancies,
            recorded_at,
        }
    }

    /// Whether this entry records a defect (non-empty discrepancy list).
    pub fn is_exception(&self) -> bool {
        !self.discrepancies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discrepancy_list_accumulates_in_order() {
        let mut list = DiscrepancyList::new();
        assert!(list.is_empty());
        list.push("price mismatch");
        list.push("date mismatch");
        assert_eq!(list.len(), 2);
        let collected: Vec<&str> = list.iter().collect();
        assert_eq!(collected, vec!["price mismatch", "date mismatch"]);
        assert_eq!(list.to_string(), "price mismatch; date mismatch");
    }

    #[test]
    fn test_clean_entry_is_not_exception() {
        let entry = AuditLogEntry::new(
            TradeId::new("T-1"),
            Stage::Matching,
            TradeStatus::Matched,
            DiscrepancyList::new(),
            Utc::now(),
        );
        assert!(!entry.is_exception());
    }

    #[test]
    fn test_exception_entry() {
        let mut d = DiscrepancyList::new();
        d.push("no counterpart found");
        let entry = AuditLogEntry::new(
            TradeId::new("T-2"),
            Stage::Matching,
            TradeStatus::UnmatchedFinal,
            d,
            Utc::now(),
        );
        assert!(entry.is_exception());
        assert!(entry.discrepancies.contains("no counterpart found"));
    }

    #[test]
    fn test_entry_ids_are_unique() {
        let e1 = AuditLogEntry::new(
            TradeId::new("T-1"),
            Stage::Settlement,
            TradeStatus::Settled,
            DiscrepancyList::new(),
            Utc::now(),
        );
        let e2 = AuditLogEntry::new(
            TradeId::new("T-1"),
            Stage::Settlement,
            TradeStatus::Settled,
            DiscrepancyList::new(),
            Utc::now(),
        );
        assert_ne!(e1.entry_id, e2.entry_id);
    }
}
