//! Run-level error type
//!
//! Field-level discrepancies never surface here; they are data on the
//! audit trail. A `RunError` means the stage aborted and committed
//! nothing.

use thiserror::Error;
use trade_store::StoreError;
use types::errors::ConfigError;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Data access failure: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration failure: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_wraps() {
        let err: RunError = StoreError::Backend("connection reset".to_string()).into();
        assert!(err.to_string().contains("Data access failure"));
    }

    #[test]
    fn test_config_error_wraps() {
        let err: RunError = ConfigError::Missing {
            field: "holidays".to_string(),
        }
        .into();
        assert!(matches!(err, RunError::Config(_)));
    }
}
