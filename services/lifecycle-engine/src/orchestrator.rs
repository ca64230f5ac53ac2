//! Lifecycle orchestrator
//!
//! Sequences the stages and owns the commit discipline: each stage run
//! snapshots its candidate set, plans every transition in-process, and
//! commits one transition batch — every status change paired with its
//! audit entry, all-or-nothing. A failed run leaves every trade in its
//! pre-run status, so re-invocation after an external timeout is safe.

use crate::config::RunConfig;
use crate::counterparty::CounterpartySource;
use crate::error::RunError;
use crate::report::{self, RunReport, SettlementRecord, StageReport};
use crate::rules::RuleProvider;
use crate::stages::{matching, reconciliation, settlement, verification};
use chrono::{DateTime, Utc};
use trade_store::{StatusChange, TradeStore, TransitionBatch};
use types::audit::{AuditLogEntry, Stage};
use types::status::TradeStatus;

/// Drives trades through the lifecycle against an injected store, rule
/// provider, and counterparty source. All collaborators arrive at
/// construction; there is no ambient configuration.
pub struct Orchestrator<S, R, C> {
    store: S,
    rules: R,
    counterparty: C,
    config: RunConfig,
}

impl<S, R, C> Orchestrator<S, R, C>
where
    S: TradeStore,
    R: RuleProvider,
    C: CounterpartySource,
{
    pub fn new(store: S, rules: R, counterparty: C, config: RunConfig) -> Self {
        Self {
            store,
            rules,
            counterparty,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable store access for the ingestion boundary.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Run the verification gate over `UNVERIFIED` trades.
    ///
    /// Rule data is loaded and validated before any trade is fetched; a
    /// configuration failure aborts with the store untouched.
    pub fn run_verification(&mut self, now: DateTime<Utc>) -> Result<StageReport, RunError> {
        let rules = self.rules.load_rules()?;
        let snapshot = self.store.fetch_by_status(TradeStatus::Unverified)?;
        let changes = verification::plan(&rules, &snapshot);
        self.commit_stage(Stage::Verification, now, snapshot.len(), changes)
    }

    /// Run matching over `UNMATCHED` trades.
    pub fn run_matching(&mut self, now: DateTime<Utc>) -> Result<StageReport, RunError> {
        let snapshot = self.store.fetch_by_status(TradeStatus::Unmatched)?;
        let changes = matching::plan(&snapshot);
        self.commit_stage(Stage::Matching, now, snapshot.len(), changes)
    }

    /// Run reconciliation over `MATCHED` and deferred `RECON_SKIPPED`
    /// trades.
    pub fn run_reconciliation(&mut self, now: DateTime<Utc>) -> Result<StageReport, RunError> {
        let snapshot = self
            .store
            .fetch_by_statuses(&[TradeStatus::Matched, TradeStatus::ReconSkipped])?;
        let changes =
            reconciliation::plan(&snapshot, &self.counterparty, self.config.order_type_mismatch)?;
        self.commit_stage(Stage::Reconciliation, now, snapshot.len(), changes)
    }

    /// Run settlement over `RECONCILED` pairs, returning the export batch
    /// for the result sink alongside the stage report.
    pub fn run_settlement(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<(StageReport, Vec<SettlementRecord>), RunError> {
        let snapshot = self.store.fetch_by_status(TradeStatus::Reconciled)?;
        let (changes, records) = settlement::plan(&snapshot, now);
        let report = self.commit_stage(Stage::Settlement, now, snapshot.len(), changes)?;
        Ok((report, records))
    }

    /// One full run: verification (if enabled) -> matching ->
    /// reconciliation -> settlement.
    pub fn run_all(&mut self, now: DateTime<Utc>) -> Result<RunReport, RunError> {
        let log_before = self.store.audit_log()?.len();
        let mut stages = Vec::with_capacity(4);

        if self.config.verification_enabled {
            stages.push(self.run_verification(now)?);
        }
        stages.push(self.run_matching(now)?);
        stages.push(self.run_reconciliation(now)?);
        let (settle_report, export) = self.run_settlement(now)?;
        stages.push(settle_report);

        // Exceptions produced by this run only.
        let log = self.store.audit_log()?;
        let exceptions = report::exceptions(&log[log_before..]);

        Ok(RunReport {
            stages,
            export,
            exceptions,
        })
    }

    /// All audit entries with non-empty discrepancies, for the
    /// notification sink.
    pub fn exception_report(&self) -> Result<Vec<AuditLogEntry>, RunError> {
        let log = self.store.audit_log()?;
        Ok(report::exceptions(&log))
    }

    fn commit_stage(
        &mut self,
        stage: Stage,
        now: DateTime<Utc>,
        processed: usize,
        changes: Vec<StatusChange>,
    ) -> Result<StageReport, RunError> {
        let report = StageReport::tally(stage, processed, &changes);
        if !changes.is_empty() {
            let mut batch = TransitionBatch::new(stage, now);
            for change in changes {
                batch.push(change);
            }
            self.store.commit(batch)?;
        }
        tracing::info!(
            stage = %stage,
            processed = report.processed,
            clean = report.clean,
            errored = report.errored,
            deferred = report.deferred,
            "stage run complete"
        );
        Ok(report)
    }
}
