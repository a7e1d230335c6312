//! Fan level progression over cumulative EXP.
//!
//! Levels are defined by a fixed ascending table of 50 tiers, each an
//! inclusive `[floor, ceiling]` EXP range. The final tier carries an
//! effectively unreachable ceiling so max-level fans still render progress
//! against a bounded range.

/// Inclusive cumulative-EXP bounds of one level tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTier {
    pub floor: u32,
    pub ceiling: u32,
}

const fn tier(floor: u32, ceiling: u32) -> LevelTier {
    LevelTier { floor, ceiling }
}

/// The fixed level table. Index = level - 1.
///
/// The last entry is an open-ended sentinel: its ceiling stands in for
/// "max level reached".
pub const LEVEL_TIERS: [LevelTier; 50] = [
    tier(0, 39),
    tier(40, 119),
    tier(120, 239),
    tier(240, 399),
    tier(400, 599),
    tier(600, 839),
    tier(840, 1_119),
    tier(1_120, 1_439),
    tier(1_440, 1_799),
    tier(1_800, 2_199),
    tier(2_200, 2_639),
    tier(2_640, 3_119),
    tier(3_120, 3_639),
    tier(3_640, 4_199),
    tier(4_200, 4_799),
    tier(4_800, 5_439),
    tier(5_440, 6_119),
    tier(6_120, 6_839),
    tier(6_840, 7_599),
    tier(7_600, 8_399),
    tier(8_400, 9_239),
    tier(9_240, 10_119),
    tier(10_120, 11_039),
    tier(11_040, 11_999),
    tier(12_000, 12_999),
    tier(13_000, 14_039),
    tier(14_040, 15_119),
    tier(15_120, 16_239),
    tier(16_240, 17_399),
    tier(17_400, 18_599),
    tier(18_600, 19_839),
    tier(19_840, 21_119),
    tier(21_120, 22_439),
    tier(22_440, 23_799),
    tier(23_800, 25_199),
    tier(25_200, 26_639),
    tier(26_640, 28_119),
    tier(28_120, 29_639),
    tier(29_640, 31_199),
    tier(31_200, 32_799),
    tier(32_800, 34_439),
    tier(34_440, 36_119),
    tier(36_120, 37_839),
    tier(37_840, 39_599),
    tier(39_600, 41_399),
    tier(41_400, 43_239),
    tier(43_240, 45_119),
    tier(45_120, 47_039),
    tier(47_040, 48_999),
    tier(49_000, 99_999_999),
];

/// A resolved level with the EXP bounds of its tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelResult {
    /// 1-based level.
    pub level: u32,
    /// Inclusive EXP floor of the tier.
    pub floor: u32,
    /// Inclusive EXP ceiling of the tier.
    pub ceiling: u32,
}

/// Map a cumulative EXP total to its level tier.
///
/// The first tier whose ceiling covers `total_exp` wins. Totals above every
/// ceiling clamp to the last tier; negative input resolves to level 1.
#[must_use]
pub fn resolve_level(total_exp: i64) -> LevelResult {
    for (index, tier) in LEVEL_TIERS.iter().enumerate() {
        if total_exp <= i64::from(tier.ceiling) {
            return LevelResult {
                level: index as u32 + 1,
                floor: tier.floor,
                ceiling: tier.ceiling,
            };
        }
    }

    let last = LEVEL_TIERS[LEVEL_TIERS.len() - 1];
    LevelResult {
        level: LEVEL_TIERS.len() as u32,
        floor: last.floor,
        ceiling: last.ceiling,
    }
}

/// Percentage of the current tier completed, clamped to `0..=100`.
#[must_use]
pub fn progress_percent(total_exp: i64, result: &LevelResult) -> u32 {
    let span = i64::from(result.ceiling) - i64::from(result.floor);
    let gained = total_exp - i64::from(result.floor);
    let percent = (gained as f64 * 100.0 / span.max(1) as f64).round() as i64;
    percent.clamp(0, 100) as u32
}

/// EXP still missing to finish the current tier. Zero once past the ceiling.
#[must_use]
pub fn exp_to_next(total_exp: i64, result: &LevelResult) -> i64 {
    (i64::from(result.ceiling) - total_exp).max(0)
}
