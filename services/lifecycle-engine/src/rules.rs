//! Rule/reference data providers
//!
//! Rules are loaded once per verification run. The JSON provider reads
//! the same `rules.json` document shape the object store distributes;
//! the static provider wraps a literal rule set for embedded use and
//! tests.

use std::fs;
use std::path::PathBuf;
use types::errors::ConfigError;
use types::rules::RuleSet;

/// Source of verification rule data.
pub trait RuleProvider {
    /// Load and validate the rule set. A broken rule set aborts the
    /// verification run before any trade is touched.
    fn load_rules(&self) -> Result<RuleSet, ConfigError>;
}

/// Provider wrapping an in-memory rule set.
#[derive(Debug, Clone)]
pub struct StaticRules {
    rules: RuleSet,
}

impl StaticRules {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }
}

impl RuleProvider for StaticRules {
    fn load_rules(&self) -> Result<RuleSet, ConfigError> {
        self.rules.validate()?;
        Ok(self.rules.clone())
    }
}

/// Provider reading a `rules.json` file from disk.
#[derive(Debug, Clone)]
pub struct JsonRules {
    path: PathBuf,
}

impl JsonRules {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse a rule document from a JSON string.
    pub fn parse(json: &str) -> Result<RuleSet, ConfigError> {
        let rules: RuleSet =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }
}

impl RuleProvider for JsonRules {
    fn load_rules(&self) -> Result<RuleSet, ConfigError> {
        let raw = fs::read_to_string(&self.path)?;
        Self::parse(&raw)
    }
}
