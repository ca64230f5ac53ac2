//! Trade row and order side types

use crate::ids::{BrokerId, Ticker, TradeId};
use crate::status::TradeStatus;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order
    BUY,
    /// Sell order
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::BUY => write!(f, "BUY"),
            Side::SELL => write!(f, "SELL"),
        }
    }
}

/// A single trade row as held in the trade store.
///
/// One economic transaction is represented by two rows sharing a
/// `trade_id` with opposite sides and mutually swapped broker ids.
/// Rows are created by ingestion in `Unverified` status and mutated
/// exclusively by stage runs; they are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub ticker: Ticker,
    /// Positive integer for a settleable trade; zero and negative values
    /// are representable so defective feeds surface as discrepancies.
    pub quantity: i64,
    pub price: Decimal,
    pub trade_date: NaiveDate,
    pub side: Side,
    pub broker_id: BrokerId,
    pub contra_broker_id: BrokerId,
    pub status: TradeStatus,
    pub settled_at: Option<DateTime<Utc>>,
}

impl Trade {
    /// Create a new trade row in `Unverified` status (the ingestion entry
    /// point into the lifecycle).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trade_id: TradeId,
        ticker: Ticker,
        quantity: i64,
        price: Decimal,
        trade_date: NaiveDate,
        side: Side,
        broker_id: BrokerId,
        contra_broker_id: BrokerId,
    ) -> Self {
        Self {
            trade_id,
            ticker,
            quantity,
            price,
            trade_date,
            side,
            broker_id,
            contra_broker_id,
            status: TradeStatus::Unverified,
            settled_at: None,
        }
    }

    /// Check if the trade reached a terminal status
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check if the trade settled cleanly
    pub fn is_settled(&self) -> bool {
        matches!(self.status, TradeStatus::Settled)
    }

    /// Whether `other` is this trade's counter-trade candidate: same
    /// ticker, quantity, and date; opposite side; broker ids mutually
    /// swapped.
    pub fn is_counterpart_of(&self, other: &Trade) -> bool {
        self.ticker == other.ticker
            && self.quantity == other.quantity
            && self.trade_date == other.trade_date
            && self.side == other.side.opposite()
            && self.broker_id == other.contra_broker_id
            && self.contra_broker_id == other.broker_id
    }
}
