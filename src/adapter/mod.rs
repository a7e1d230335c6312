//! Adapters: concrete implementations of the ports plus the inbound CLI.

pub mod inbound;
pub mod outbound;
