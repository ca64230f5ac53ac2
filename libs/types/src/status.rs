//! Lifecycle status enumeration and transition table
//!
//! The transition table here is the single authority on which moves are
//! legal; the store rejects any commit that violates it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade lifecycle status.
///
/// Statuses form a forward-only graph:
/// `UNVERIFIED -> {UNMATCHED, VERIFY_ERROR}`,
/// `UNMATCHED -> {MATCHED, MATCH_ERROR, UNMATCHED_FINAL}`,
/// `MATCHED -> {RECONCILED, RECON_ERROR, RECON_SKIPPED}`,
/// `RECON_SKIPPED -> {RECONCILED, RECON_ERROR, RECON_SKIPPED}`,
/// `RECONCILED -> {SETTLED, SETTLE_ERROR}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    /// Ingested, not yet validated against reference data
    Unverified,
    /// Failed reference-data verification (terminal)
    VerifyError,
    /// Verified, awaiting a counterpart
    Unmatched,
    /// Paired with a counter-trade
    Matched,
    /// Counterpart found but fields disagreed (terminal)
    MatchError,
    /// No counterpart existed in the run's candidate set (terminal)
    UnmatchedFinal,
    /// Cross-checked against the counterparty source
    Reconciled,
    /// Counterparty cross-check failed (terminal)
    ReconError,
    /// Order-side-only mismatch; reconciliation deferred to a later run
    ReconSkipped,
    /// Settlement complete (terminal)
    Settled,
    /// Settlement validation failed (terminal)
    SettleError,
}

impl TradeStatus {
    /// Check if status is terminal (no further transitions possible).
    ///
    /// `ReconSkipped` is deliberately not terminal: a deferred trade is
    /// re-examined on the next reconciliation run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TradeStatus::VerifyError
                | TradeStatus::MatchError
                | TradeStatus::UnmatchedFinal
                | TradeStatus::ReconError
                | TradeStatus::Settled
                | TradeStatus::SettleError
        )
    }

    /// Whether a transition from `self` to `next` is permitted.
    ///
    /// `ReconSkipped -> ReconSkipped` is the only self-transition: each
    /// deferral is audited even when the outcome repeats.
    pub fn can_transition_to(&self, next: TradeStatus) -> bool {
        use TradeStatus::*;
        matches!(
            (self, next),
            (Unverified, Unmatched)
                | (Unverified, VerifyError)
                | (Unmatched, Matched)
                | (Unmatched, MatchError)
                | (Unmatched, UnmatchedFinal)
                | (Matched, Reconciled)
                | (Matched, ReconError)
                | (Matched, ReconSkipped)
                | (ReconSkipped, Reconciled)
                | (ReconSkipped, ReconError)
                | (ReconSkipped, ReconSkipped)
                | (Reconciled, Settled)
                | (Reconciled, SettleError)
        )
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeStatus::Unverified => "UNVERIFIED",
            TradeStatus::VerifyError => "VERIFY_ERROR",
            TradeStatus::Unmatched => "UNMATCHED",
            TradeStatus::Matched => "MATCHED",
            TradeStatus::MatchError => "MATCH_ERROR",
            TradeStatus::UnmatchedFinal => "UNMATCHED_FINAL",
            TradeStatus::Reconciled => "RECONCILED",
            TradeStatus::ReconError => "RECON_ERROR",
            TradeStatus::ReconSkipped => "RECON_SKIPPED",
            TradeStatus::Settled => "SETTLED",
            TradeStatus::SettleError => "SETTLE_ERROR",
        };
        write!(f, "{}", s)
    }
}
