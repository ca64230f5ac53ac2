//! Trade Store Adapter
//!
//! Typed read/write access to trade rows and the audit log, with atomic
//! transition batches: every status change commits together with its
//! audit entry, all-or-nothing per stage run. No business logic lives
//! here beyond enforcing the status-transition table at commit time.

pub mod memory;
pub mod store;

pub use memory::MemoryTradeStore;
pub use store::{RowId, StatusChange, StoreError, TradeRow, TradeStore, TransitionBatch};
