//! Verification rule set
//!
//! Loaded once per verification run from the rule/reference data provider.
//! The JSON shape matches the `rules.json` document the upstream system
//! distributes; serde aliases accept the historical key names.

use crate::errors::ConfigError;
use crate::ids::{BrokerId, Ticker};
use crate::trade::Side;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Reference-price validation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceValidation {
    pub enabled: bool,
    /// Per-ticker reference prices the deviation check compares against
    #[serde(default)]
    pub reference_prices: BTreeMap<Ticker, Decimal>,
}

/// Static/reference rule data consumed by the verification stage.
///
/// Broker lists have inverted polarity, preserved verbatim from the
/// upstream contract: a broker id that appears in the configured list
/// FAILS the check. The historical JSON key is `approved_brokers`; the
/// field name documents the effective behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Broker ids whose presence fails a trade's broker check
    #[serde(default, alias = "approved_brokers")]
    pub disapproved_brokers: BTreeSet<BrokerId>,
    /// Contra-broker ids whose presence fails the contra-broker check
    #[serde(default, alias = "approved_contra_brokers")]
    pub disapproved_contra_brokers: BTreeSet<BrokerId>,
    /// Order sides accepted by verification
    #[serde(default, alias = "valid_order_types")]
    pub valid_sides: BTreeSet<Side>,
    /// Known instruments; when empty, the reference-price keys serve as
    /// the instrument universe (historical behavior)
    #[serde(default)]
    pub valid_tickers: BTreeSet<Ticker>,
    #[serde(default)]
    pub price_validation: PriceValidation,
    /// Allowed deviation as a percentage of the reference price
    #[serde(default, alias = "price_deviation_pct")]
    pub deviation_pct: Decimal,
    /// Dates on which no trade may be dated
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
}

impl RuleSet {
    /// Whether `ticker` is a known instrument.
    pub fn is_known_instrument(&self, ticker: &Ticker) -> bool {
        if self.valid_tickers.is_empty() {
            self.price_validation.reference_prices.contains_key(ticker)
        } else {
            self.valid_tickers.contains(ticker)
        }
    }

    /// Reference price for `ticker`, if configured.
    pub fn reference_price(&self, ticker: &Ticker) -> Option<Decimal> {
        self.price_validation.reference_prices.get(ticker).copied()
    }

    /// Sanity-check the rule data before any trade is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deviation_pct < Decimal::ZERO {
            return Err(ConfigError::Invalid {
                field: "deviation_pct".to_string(),
                reason: format!("must be non-negative, got {}", self.deviation_pct),
            });
        }
        if self.valid_sides.is_empty() {
            return Err(ConfigError::Missing {
                field: "valid_order_types".to_string(),
            });
        }
        if self.valid_tickers.is_empty() && self.price_validation.reference_prices.is_empty() {
            return Err(ConfigError::Missing {
                field: "valid_tickers".to_string(),
            });
        }
        if self.price_validation.enabled && self.price_validation.reference_prices.is_empty() {
            return Err(ConfigError::Missing {
                field: "price_validation.reference_prices".to_string(),
            });
        }
        Ok(())
    }
}
