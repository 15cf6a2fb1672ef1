//! Interactive commands typed into the running client.
//!
//! One command per line. Only `Symbol`, `Clear` and `Refresh` reach the poller;
//! the rest change local view settings or the client itself.
use live_price_common::{DisplayCurrency, LivePriceError, Symbol};
use std::str::FromStr;

/// Help text printed for `h`.
pub const HELP: &str = "\
Commands:
  r, refresh          fetch now (ignored while a fetch is running)
  s, symbol <SYMBOL>  track another symbol
  x, clear            stop tracking
  c, currency         toggle USD/INR
  usd | inr           pick a currency
  d, dark             toggle dark mode
  h, help             show this help
  q, quit             exit";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Manual refresh.
    Refresh,
    /// Track a new symbol.
    Symbol(Symbol),
    /// Stop tracking.
    Clear,
    /// Flip between USD and INR.
    ToggleCurrency,
    /// Pick a specific currency.
    Currency(DisplayCurrency),
    /// Flip dark mode.
    ToggleDarkMode,
    /// Print the help text.
    Help,
    /// Exit.
    Quit,
}

impl FromStr for UserCommand {
    type Err = LivePriceError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Err(LivePriceError::InvalidArgument("empty command".into()));
        };
        let argument = parts.next();
        if parts.next().is_some() {
            return Err(LivePriceError::InvalidArgument(format!(
                "too many arguments: {line:?}"
            )));
        }

        let command = match (word.to_ascii_lowercase().as_str(), argument) {
            ("r" | "refresh", None) => UserCommand::Refresh,
            ("s" | "symbol", Some(raw)) => UserCommand::Symbol(raw.parse()?),
            ("s" | "symbol", None) => {
                return Err(LivePriceError::InvalidArgument("symbol needs a ticker".into()));
            }
            ("x" | "clear", None) => UserCommand::Clear,
            ("c" | "currency", None) => UserCommand::ToggleCurrency,
            ("c" | "currency", Some(raw)) => UserCommand::Currency(parse_currency(raw)?),
            ("usd" | "inr", None) => UserCommand::Currency(parse_currency(word)?),
            ("d" | "dark", None) => UserCommand::ToggleDarkMode,
            ("h" | "help" | "?", None) => UserCommand::Help,
            ("q" | "quit" | "exit", None) => UserCommand::Quit,
            _ => {
                return Err(LivePriceError::InvalidArgument(format!(
                    "unknown command {line:?} (h for help)"
                )));
            }
        };
        Ok(command)
    }
}

fn parse_currency(raw: &str) -> Result<DisplayCurrency, LivePriceError> {
    raw.parse()
        .map_err(|_| LivePriceError::InvalidArgument(format!("unknown currency {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> UserCommand {
        line.parse().unwrap()
    }

    #[test]
    fn test_short_and_long_forms() {
        assert_eq!(parse("r"), UserCommand::Refresh);
        assert_eq!(parse(" REFRESH "), UserCommand::Refresh);
        assert_eq!(parse("x"), UserCommand::Clear);
        assert_eq!(parse("c"), UserCommand::ToggleCurrency);
        assert_eq!(parse("d"), UserCommand::ToggleDarkMode);
        assert_eq!(parse("q"), UserCommand::Quit);
        assert_eq!(parse("help"), UserCommand::Help);
    }

    #[test]
    fn test_symbol_argument() {
        assert_eq!(
            parse("s tcs.ns"),
            UserCommand::Symbol("TCS.NS".parse().unwrap())
        );
        assert!("s".parse::<UserCommand>().is_err());
        assert!("s a b".parse::<UserCommand>().is_err());
    }

    #[test]
    fn test_currency_forms() {
        assert_eq!(parse("inr"), UserCommand::Currency(DisplayCurrency::INR));
        assert_eq!(parse("currency usd"), UserCommand::Currency(DisplayCurrency::USD));
        assert!("currency eur".parse::<UserCommand>().is_err());
    }

    #[test]
    fn test_rejects_unknown_and_empty() {
        assert!("".parse::<UserCommand>().is_err());
        assert!("launch".parse::<UserCommand>().is_err());
        assert!("r now".parse::<UserCommand>().is_err());
    }
}
