//! Identifier types for trade lifecycle entities
//!
//! Trade identifiers come from the upstream ingestion feed and are opaque
//! strings; both legs of one economic transaction share the same TradeId
//! and differ in order side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a trade, unique per (trade, side) within a source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(String);

impl TradeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TradeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier for an executing or contra broker.
///
/// Broker ids are totally ordered (lexicographic); settlement relies on
/// this ordering to process each pair exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrokerId(String);

impl BrokerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BrokerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BrokerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Instrument ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
