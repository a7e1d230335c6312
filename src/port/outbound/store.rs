//! Durable key-value storage and clock ports.
//!
//! Both are injected rather than ambient so tests can substitute an
//! in-memory store and a manual clock.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;

/// Durable string key-value storage.
///
/// Holds the price cache, provider cooldown timestamps, and boost
/// baselines under fixed keys. Single-writer by construction.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    fn delete(&self, key: &str) -> Result<()>;

    /// Drop every entry. Used after a successful claim.
    fn clear(&self) -> Result<()>;
}

/// Millisecond wall-clock source.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// The real system clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}
