//! Token metadata, base-unit formatting, and wallet address validation.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::TokenEntry;

/// An ERC-20 token as the formatters see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec {
    /// 0x-prefixed contract address.
    pub address: String,
    /// Number of base-unit decimals.
    pub decimals: u32,
    /// Display symbol.
    pub symbol: String,
}

impl TokenSpec {
    /// Convert a raw base-unit amount into whole-token units.
    ///
    /// Amounts beyond `Decimal` range saturate instead of panicking; no
    /// real balance gets near the 96-bit mantissa.
    #[must_use]
    pub fn to_decimal(&self, raw: u128) -> Decimal {
        let value = Decimal::try_from(raw as i128).unwrap_or(Decimal::MAX);
        value / Decimal::from(10u64.pow(self.decimals))
    }

    /// Render a raw base-unit amount with exactly `decimals` fraction
    /// digits. Zero-decimal tokens render as plain integers.
    #[must_use]
    pub fn format_units(&self, raw: u128) -> String {
        if self.decimals == 0 {
            return raw.to_string();
        }
        let mut value = self.to_decimal(raw);
        value.rescale(self.decimals);
        value.to_string()
    }
}

impl From<&TokenEntry> for TokenSpec {
    fn from(entry: &TokenEntry) -> Self {
        Self {
            address: entry.address.clone(),
            decimals: entry.decimals,
            symbol: entry.symbol.clone(),
        }
    }
}

/// Parse a raw base-unit balance string as returned by the indexer.
///
/// Anything unparseable degrades to zero, matching the indexer's own
/// `"0"` fallback.
#[must_use]
pub fn parse_raw_balance(raw: &str) -> u128 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<u128>() {
        return value;
    }
    // Some indexers render very large balances in scientific notation.
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v as u128)
        .unwrap_or(0)
}

/// Wallet address validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must start with 0x")]
    MissingPrefix,

    #[error("address too short: {len} chars, expected at least 42")]
    TooShort { len: usize },
}

/// A claim-eligible wallet address.
///
/// Validation matches what the claim webhook enforces: a `0x` prefix and
/// at least 42 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();
        if !trimmed.starts_with("0x") {
            return Err(AddressError::MissingPrefix);
        }
        if trimmed.len() < 42 {
            return Err(AddressError::TooShort {
                len: trimmed.len(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated `0x1234...abcd` form for display.
    #[must_use]
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fan_token() -> TokenSpec {
        TokenSpec {
            address: "0x69eFD833288605f320d77eB2aB99DDE62919BbC1".into(),
            decimals: 2,
            symbol: "FAN".into(),
        }
    }

    #[test]
    fn format_units_keeps_two_decimals() {
        let token = fan_token();
        assert_eq!(token.format_units(1234), "12.34");
        assert_eq!(token.format_units(100), "1.00");
        assert_eq!(token.format_units(0), "0.00");
    }

    #[test]
    fn zero_decimal_token_formats_as_integer() {
        let token = TokenSpec {
            address: "0x6F1fFd03106B27781E86b33Df5dBB734ac9DF4bb".into(),
            decimals: 0,
            symbol: "CREW".into(),
        };
        assert_eq!(token.format_units(7), "7");
        assert_eq!(token.to_decimal(7), dec!(7));
    }

    #[test]
    fn to_decimal_scales_by_decimals() {
        let token = fan_token();
        assert_eq!(token.to_decimal(1234), dec!(12.34));
    }

    #[test]
    fn parse_raw_balance_tolerates_garbage() {
        assert_eq!(parse_raw_balance("123"), 123);
        assert_eq!(parse_raw_balance(" 42 "), 42);
        assert_eq!(parse_raw_balance("not-a-number"), 0);
        assert_eq!(parse_raw_balance(""), 0);
        assert_eq!(parse_raw_balance("-5"), 0);
    }

    #[test]
    fn wallet_address_requires_prefix_and_length() {
        assert_eq!(
            WalletAddress::parse("abc"),
            Err(AddressError::MissingPrefix)
        );
        assert_eq!(
            WalletAddress::parse("0x1234"),
            Err(AddressError::TooShort { len: 6 })
        );
        let ok = WalletAddress::parse("0xe85b32a44b9eD3ecf8bd331FED46fbdAcDBc9940");
        assert!(ok.is_ok());
    }

    #[test]
    fn wallet_address_short_form() {
        let address = WalletAddress::parse("0xe85b32a44b9eD3ecf8bd331FED46fbdAcDBc9940").unwrap();
        assert_eq!(address.short(), "0xe85b...9940");
    }
}
