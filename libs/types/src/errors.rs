//! Error taxonomy for the trade lifecycle system
//!
//! Business-rule mismatches are not errors: they accumulate into a
//! trade's discrepancy list and the trade moves to an error status. Only
//! configuration and data-access failures abort a run.

use thiserror::Error;

/// Missing or invalid rule/reference data.
///
/// Raised before any trade is touched; a verification run never starts
/// with a broken rule set.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing rule data: {field}")]
    Missing { field: String },

    #[error("Invalid rule data: {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Failed to read rule data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse rule data: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Missing {
            field: "valid_tickers".to_string(),
        };
        assert_eq!(err.to_string(), "Missing rule data: valid_tickers");
    }

    #[test]
    fn test_io_error_wraps() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "rules.json");
        let err: ConfigError = io.into();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
