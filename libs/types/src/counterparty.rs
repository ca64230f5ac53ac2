//! Second-source counterparty records
//!
//! A counterparty record is the clearing feed's view of a trade, used only
//! by reconciliation. Zero, one, or many candidate rows may exist per
//! trade identifier.

use crate::ids::{Ticker, TradeId};
use crate::trade::Side;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One candidate row from the counterparty source, keyed by trade id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterpartyRecord {
    pub trade_id: TradeId,
    pub ticker: Ticker,
    pub quantity: i64,
    pub price: Decimal,
    pub trade_date: NaiveDate,
    pub side: Side,
}

impl CounterpartyRecord {
    pub fn new(
        trade_id: TradeId,
        ticker: Ticker,
        quantity: i64,
        price: Decimal,
        trade_date: NaiveDate,
        side: Side,
    ) -> Self {
        Self {
            trade_id,
            ticker,
            quantity,
            price,
            trade_date,
            side,
        }
    }
}
