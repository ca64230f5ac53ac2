//! Counterparty source adapter
//!
//! Reconciliation cross-checks matched trades against an independent
//! second source (a clearing feed). The source is read-only from the
//! lifecycle's perspective.

use std::collections::HashMap;
use trade_store::StoreError;
use types::counterparty::CounterpartyRecord;
use types::ids::TradeId;

/// Read access to the second-source view of trades.
pub trait CounterpartySource {
    /// All candidate rows for `trade_id`; may be empty.
    fn candidates(&self, trade_id: &TradeId) -> Result<Vec<CounterpartyRecord>, StoreError>;
}

/// In-memory counterparty source for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryCounterpartySource {
    records: HashMap<TradeId, Vec<CounterpartyRecord>>,
}

impl MemoryCounterpartySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: CounterpartyRecord) {
        self.records
            .entry(record.trade_id.clone())
            .or_default()
            .push(record);
    }

    /// Drop all candidate rows for a trade id (test convenience for
    /// simulating feed corrections).
    pub fn remove(&mut self, trade_id: &TradeId) {
        self.records.remove(trade_id);
    }
}

impl CounterpartySource for MemoryCounterpartySource {
    fn candidates(&self, trade_id: &TradeId) -> Result<Vec<CounterpartyRecord>, StoreError> {
        Ok(self.records.get(trade_id).cloned().unwrap_or_default())
    }
}
