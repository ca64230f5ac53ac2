//! Run configuration
//!
//! The historical scripts forked near-duplicate variants of the same
//! state machine; the variations live here as explicit configuration
//! instead of forked code paths.

use serde::{Deserialize, Serialize};

/// How reconciliation treats a counterparty row that matches on every
/// economic field but the order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderTypeMismatch {
    /// Flag as `RECON_SKIPPED` and retry on a later run (default; treats
    /// the mismatch as data-entry ambiguity, not an economic mismatch)
    Defer,
    /// Treat like any other mismatch: `RECON_ERROR`
    Error,
}

/// Configuration for one orchestrator instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Whether the pre-matching verification gate runs at all
    pub verification_enabled: bool,
    pub order_type_mismatch: OrderTypeMismatch,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            verification_enabled: true,
            order_type_mismatch: OrderTypeMismatch::Defer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert!(config.verification_enabled);
        assert_eq!(config.order_type_mismatch, OrderTypeMismatch::Defer);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = RunConfig {
            verification_enabled: false,
            order_type_mismatch: OrderTypeMismatch::Error,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
