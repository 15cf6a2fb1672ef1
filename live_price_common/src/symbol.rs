//! Ticker symbols tracked by the live price poller.
//!
//! Unlike a closed list of tickers, a `Symbol` accepts any exchange-qualified
//! identifier (`AAPL`, `RELIANCE.NS`, `BRK-B`) as long as it is non-empty and
//! safe to embed in a request path.
use std::fmt;
use std::str::FromStr;

use crate::error::LivePriceError;

/// Non-empty, upper-cased ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Returns the symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw symbol string from the wire.
    pub fn matches(&self, raw: &str) -> bool {
        self.0.eq_ignore_ascii_case(raw.trim())
    }
}

impl FromStr for Symbol {
    type Err = LivePriceError;

    /// Trims whitespace and one pair of matching quotes, then upper-cases.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let unquoted = trimmed
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(trimmed)
            .trim();

        if unquoted.is_empty() {
            return Err(LivePriceError::InvalidSymbol("symbol is empty".into()));
        }
        if let Some(bad) = unquoted
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#'))
        {
            return Err(LivePriceError::InvalidSymbol(format!(
                "{unquoted:?} contains {bad:?}"
            )));
        }

        Ok(Symbol(unquoted.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for Symbol {
    type Error = LivePriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
