//! Greenroom - fan engagement levels and token wallet telemetry.
//!
//! This crate backs a musician's fan-token campaign with two read-side
//! capabilities: engagement tracking (EXP, levels, like/save boosts,
//! reward claims) and wallet telemetry (token balances, staking state,
//! and a EUR price for the fan token resolved through a fallback chain of
//! public rate providers with durable caching).
//!
//! # Architecture
//!
//! Hexagonal, smallest-thing-that-works edition:
//!
//! - [`domain`] - pure types and computation: the level table, price
//!   provenance, token formatting, engagement flows
//! - [`port`] - trait contracts for every external collaborator: rate
//!   providers, DEX quoting, on-chain reads, webhooks, storage
//! - [`adapter`] - HTTP/RPC/SQLite implementations of the ports plus the
//!   clap CLI in front
//! - [`service`] - use cases: the price engine, wallet snapshots, and
//!   the engagement flows
//! - [`app`] - configuration-driven wiring
//!
//! # Price resolution
//!
//! The fan token has no direct fiat quote. Its EUR price is composed from
//! a DEX swap quote (token → native ETH) and an ETH/EUR rate resolved
//! through an ordered provider chain (CoinGecko, CryptoCompare, Binance),
//! each behind a 30-second cooldown gate. Every cycle degrades through
//! the persisted cache to a hard default, so callers always get a
//! displayable value with a provenance tag.
//!
//! # Features
//!
//! - `onchain` (default) - staking pool reads over JSON-RPC via alloy
//! - `testkit` - in-memory fakes for integration tests

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod service;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
