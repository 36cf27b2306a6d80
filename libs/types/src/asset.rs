//! Asset identification
//!
//! A ticker is a fixed-width symbol: 1 to 32 bytes of visible ASCII, so any
//! `bytes32`-style symbol such as `TOKEN-DOES-NOT-EXIST` is well formed.
//! Whether it is *registered* is the registry's business, not the type's.
//! Tickers are validated once at construction so the rest of the system can
//! pass them around without re-checking.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum ticker width in bytes
pub const TICKER_MAX_LEN: usize = 32;

/// Rejected ticker symbol
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid ticker {symbol:?}: must be 1-{max} visible ASCII characters", max = TICKER_MAX_LEN)]
pub struct InvalidTicker {
    pub symbol: String,
}

/// Asset ticker symbol (e.g. "DAI", "ZRX")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Create a ticker from a known-good literal
    ///
    /// # Panics
    /// Panics if the symbol is malformed
    #[cfg(any(test, feature = "test-util"))]
    pub fn new(symbol: impl Into<String>) -> Self {
        match Self::try_new(symbol) {
            Ok(ticker) => ticker,
            Err(err) => panic!("{err}"),
        }
    }

    /// Try to create a ticker, rejecting malformed symbols
    pub fn try_new(symbol: impl Into<String>) -> Result<Self, InvalidTicker> {
        let symbol = symbol.into();
        let valid = !symbol.is_empty()
            && symbol.len() <= TICKER_MAX_LEN
            && symbol.bytes().all(|b| b.is_ascii_graphic());
        if valid {
            Ok(Self(symbol))
        } else {
            Err(InvalidTicker { symbol })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = InvalidTicker;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

/// Opaque handle to the external token contract backing an asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenHandle(String);

impl TokenHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registered asset as reported by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub ticker: Ticker,
    pub handle: TokenHandle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_valid() {
        let ticker = Ticker::new("DAI");
        assert_eq!(ticker.as_str(), "DAI");
        assert_eq!(ticker.to_string(), "DAI");
    }

    #[test]
    fn test_ticker_rejects_empty_and_long() {
        assert!(Ticker::try_new("").is_err());
        assert!(Ticker::try_new("A".repeat(TICKER_MAX_LEN)).is_ok());
        assert!(Ticker::try_new("A".repeat(TICKER_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn test_ticker_accepts_punctuation() {
        assert!(Ticker::try_new("TOKEN-DOES-NOT-EXIST").is_ok());
        assert!(Ticker::try_new("BTC/USDT").is_ok());
    }

    #[test]
    fn test_ticker_rejects_whitespace_and_non_ascii() {
        let err = Ticker::try_new("Z R X").unwrap_err();
        assert_eq!(err.symbol, "Z R X");
        assert!(err.to_string().contains("Z R X"));
        assert!(Ticker::try_new("DAI\n").is_err());
        assert!(Ticker::try_new("ÉTH").is_err());
    }

    #[test]
    #[should_panic(expected = "Invalid ticker")]
    fn test_ticker_new_panics_on_invalid() {
        Ticker::new("");
    }

    #[test]
    fn test_ticker_deserialize_validates() {
        let ok: Ticker = serde_json::from_str("\"ZRX\"").unwrap();
        assert_eq!(ok, Ticker::new("ZRX"));
        let dashed: Ticker = serde_json::from_str("\"TOKEN-DOES-NOT-EXIST\"").unwrap();
        assert_eq!(dashed.as_str(), "TOKEN-DOES-NOT-EXIST");
        assert!(serde_json::from_str::<Ticker>("\"Z R X\"").is_err());
    }
}
