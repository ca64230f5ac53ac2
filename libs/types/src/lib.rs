//! Types library for the trade lifecycle system
//!
//! This library provides all core type definitions shared by the trade
//! store and the lifecycle engine, ensuring type safety and a single
//! authoritative status-transition table.
//!
//! # Modules
//! - `ids`: Unique identifiers (TradeId, BrokerId, Ticker)
//! - `trade`: Trade row and order side types
//! - `status`: Lifecycle status enumeration and transition table
//! - `audit`: Audit log entries and discrepancy lists
//! - `counterparty`: Second-source counterparty records
//! - `rules`: Verification rule set
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod trade;
pub mod status;
pub mod audit;
pub mod counterparty;
pub mod rules;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::trade::*;
    pub use crate::status::*;
    pub use crate::audit::*;
    pub use crate::counterparty::*;
    pub use crate::rules::*;
    pub use crate::errors::*;
}
