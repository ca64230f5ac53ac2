//! Trade Lifecycle Engine
//!
//! Drives trade records through the post-trade lifecycle:
//! verification, matching, reconciliation, and settlement. Each stage
//! consumes trades filtered by status, applies the shared comparator
//! rules, and plans transitions the orchestrator commits atomically with
//! their audit entries.
//!
//! **Key invariants:**
//! - Every transition pairs with exactly one audit entry
//! - Transitions follow the status table forward-only
//! - Stage runs are deterministic over a snapshot (same inputs, same plan)
//! - Both legs of a settled pair always share a resulting status

pub mod comparator;
pub mod config;
pub mod counterparty;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod rules;
pub mod stages;

pub use config::{OrderTypeMismatch, RunConfig};
pub use error::RunError;
pub use orchestrator::Orchestrator;
pub use report::{RunReport, SettlementRecord, StageReport};
