//! Lifecycle stages
//!
//! Each stage is a pure planning function over a snapshot of candidate
//! rows: it decides every transition for the run and returns the plan
//! for the orchestrator to commit atomically. Stages never touch the
//! store themselves.

pub mod matching;
pub mod reconciliation;
pub mod settlement;
pub mod verification;
