//! Presentation adapter: turns a quote snapshot into display-ready text.
//!
//! Everything here is a pure function of its inputs. The direction of a quote is
//! decided once by [`ChangeSign::of`] and every signed field is rendered from that
//! decision, so the arrow, the absolute change and the percent change never
//! disagree about the zero boundary (zero counts as a gain).
use strum_macros::Display;

use crate::currency::DisplayCurrency;
use crate::format;
use crate::quote::Quote;

/// Direction of a quote's change against the previous close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ChangeSign {
    /// `change >= 0`.
    Positive,
    /// `change < 0`.
    Negative,
}

impl ChangeSign {
    /// Classifies `change`; zero is `Positive`.
    pub fn of(change: f64) -> Self {
        if change >= 0.0 {
            ChangeSign::Positive
        } else {
            ChangeSign::Negative
        }
    }

    /// `true` for `Positive`.
    pub fn is_positive(self) -> bool {
        self == ChangeSign::Positive
    }

    /// Arrow glyph for the card.
    pub fn arrow(self) -> &'static str {
        match self {
            ChangeSign::Positive => "▲",
            ChangeSign::Negative => "▼",
        }
    }
}

/// Price movement between two consecutive successful polls.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TickDirection {
    Up,
    Down,
    Unchanged,
}

/// Display-ready fields for one quote in one currency.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayModel {
    pub symbol: String,
    pub name: Option<String>,
    pub price_text: String,
    pub change_sign: ChangeSign,
    pub change_text: String,
    pub change_percent_text: String,
    pub open_text: String,
    pub high_text: String,
    pub low_text: String,
    pub previous_close_text: String,
    pub volume_text: String,
}

/// Derives the display fields of `quote` in `currency`.
///
/// Money fields use the precomputed variant for `currency`; a missing INR variant
/// renders as [`format::NOT_AVAILABLE`]. The change itself is always the source's
/// USD change, as the source does not precompute an INR change.
pub fn derive(quote: &Quote, currency: DisplayCurrency) -> DisplayModel {
    let sign = currency.sign();
    let change_sign = ChangeSign::of(quote.change);
    let positive = change_sign.is_positive();

    DisplayModel {
        symbol: quote.symbol.to_string(),
        name: quote.name.clone(),
        price_text: format::money(quote.price.in_currency(currency), sign),
        change_sign,
        change_text: format::signed(Some(quote.change), positive),
        change_percent_text: format::signed_percent(Some(quote.change_percent), positive),
        open_text: format::money(quote.open.in_currency(currency), sign),
        high_text: format::money(quote.high.in_currency(currency), sign),
        low_text: format::money(quote.low.in_currency(currency), sign),
        previous_close_text: format::money(
            quote.previous_close.and_then(|p| p.in_currency(currency)),
            sign,
        ),
        volume_text: format::magnitude(Some(quote.volume as f64)),
    }
}

/// Compares the USD price of two quotes of the same symbol.
///
/// Returns `None` without a previous quote or when the symbols differ.
pub fn tick_direction(previous: Option<&Quote>, latest: &Quote) -> Option<TickDirection> {
    let previous = previous.filter(|p| p.symbol == latest.symbol)?;
    let direction = if latest.price.usd > previous.price.usd {
        TickDirection::Up
    } else if latest.price.usd < previous.price.usd {
        TickDirection::Down
    } else {
        TickDirection::Unchanged
    };
    Some(direction)
}
