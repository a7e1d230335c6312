//! Outbound adapters (driven side): HTTP, RPC, and SQLite implementations
//! of the outbound ports.

pub mod fanbase;
pub mod insight;
pub mod openocean;
pub mod rates;
pub mod sqlite;

#[cfg(feature = "onchain")]
pub mod staking;
