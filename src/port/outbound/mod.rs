//! Outbound ports (driven side): interfaces implemented by outbound
//! adapters.
//!
//! These contracts describe infrastructure dependencies such as rate
//! providers, DEX quoting, on-chain reads, webhooks, and storage.

pub mod balances;
pub mod chain;
pub mod dex;
pub mod fanbase;
pub mod rates;
pub mod store;
