//! Display currency selector.
use clap::ValueEnum;
use strum_macros::{Display, EnumString};

/// Currency in which a quote is presented.
///
/// This is a pure selector: both variants are precomputed by the quote source,
/// nothing here converts between them.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum DisplayCurrency {
    #[default]
    USD,
    INR,
}

impl DisplayCurrency {
    /// Currency sign prefixed to money values.
    pub fn sign(self) -> &'static str {
        match self {
            DisplayCurrency::USD => "$",
            DisplayCurrency::INR => "₹",
        }
    }

    /// The other currency.
    pub fn toggle(self) -> Self {
        match self {
            DisplayCurrency::USD => DisplayCurrency::INR,
            DisplayCurrency::INR => DisplayCurrency::USD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("inr".parse::<DisplayCurrency>().unwrap(), DisplayCurrency::INR);
        assert_eq!("Usd".parse::<DisplayCurrency>().unwrap(), DisplayCurrency::USD);
        assert!("eur".parse::<DisplayCurrency>().is_err());
    }

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(DisplayCurrency::USD.toggle(), DisplayCurrency::INR);
        assert_eq!(DisplayCurrency::USD.toggle().toggle(), DisplayCurrency::USD);
    }

    #[test]
    fn test_signs() {
        assert_eq!(DisplayCurrency::USD.sign(), "$");
        assert_eq!(DisplayCurrency::INR.sign(), "₹");
    }
}
