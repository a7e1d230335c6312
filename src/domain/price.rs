//! Price resolution value types: provenance tags, the persisted quote, and
//! the best-effort result every resolution cycle produces.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where a returned rate came from. Ordered weakest-first so that a
/// composed price can report the weakest contributing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Provenance {
    /// Hard-coded fallback constant.
    Default,
    /// Persisted cache from an earlier successful resolution.
    Cached,
    /// Fresh network response from this cycle.
    Live,
}

impl Provenance {
    /// The weaker of two sources.
    #[must_use]
    pub fn weakest(self, other: Self) -> Self {
        self.min(other)
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Live => "live",
            Self::Cached => "cached",
            Self::Default => "default",
        };
        f.write_str(label)
    }
}

/// The durably persisted result of a fully successful resolution.
///
/// Written only when every component is present and positive; read back as
/// the fallback source on later cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuote {
    /// Base-asset units received for one whole fan token.
    pub base_per_token: Decimal,
    /// Composed EUR price for one whole fan token.
    pub price_per_token: Decimal,
    /// EUR rate for one unit of the base asset.
    pub base_rate: Decimal,
    /// Epoch milliseconds of the resolution that produced this quote.
    pub resolved_at_ms: i64,
}

impl StoredQuote {
    #[must_use]
    pub fn age(&self, now_ms: i64) -> Duration {
        Duration::from_millis((now_ms - self.resolved_at_ms).max(0) as u64)
    }

    /// Whether the quote is younger than `max_age` as of `now_ms`.
    #[must_use]
    pub fn is_fresh(&self, now_ms: i64, max_age: Duration) -> bool {
        self.age(now_ms) < max_age
    }
}

/// Best-effort outcome of one resolution cycle. Never an error: missing
/// components are `None` and explained by `status`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrice {
    /// EUR price of one fan token, if any source could produce one.
    pub price_per_token: Option<Decimal>,
    /// Base-asset units per fan token, if any source could produce one.
    pub base_per_token: Option<Decimal>,
    /// EUR rate of the base asset. Always present (hard default at worst).
    pub base_rate: Decimal,
    /// Weakest source that contributed to `price_per_token`, or to
    /// `base_rate` when no token price exists.
    pub provenance: Provenance,
    /// Human-readable note when a stage failed; `None` on a clean cycle.
    pub status: Option<String>,
}

/// Format a EUR amount with exactly two fraction digits.
#[must_use]
pub fn format_eur(value: Decimal) -> String {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}
