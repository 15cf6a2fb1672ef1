//! Quote data model and JSON decoding.
//!
//! The quote source answers with a flat camelCase JSON object where every money
//! field comes in a USD flavour and an optional precomputed INR flavour
//! (`price` / `priceINR`, `open` / `openINR`, ...). `WireQuote` mirrors that
//! object with every field optional so that a missing field can be reported by
//! name instead of being defaulted; `WireQuote::into_quote` then enforces the
//! schema and produces a validated `Quote`.
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::currency::DisplayCurrency;
use crate::error::FetchError;
use crate::symbol::Symbol;

/// A price point in the canonical currency (USD) with its optional INR variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Priced {
    /// Value in USD.
    pub usd: f64,
    /// Precomputed value in INR, if the source supplied one.
    pub inr: Option<f64>,
}

impl Priced {
    /// Price point without an INR variant.
    pub fn usd(usd: f64) -> Self {
        Self { usd, inr: None }
    }

    /// Price point with both variants.
    pub fn dual(usd: f64, inr: f64) -> Self {
        Self { usd, inr: Some(inr) }
    }

    /// Picks the variant for `currency`; `None` when the INR variant is absent.
    pub fn in_currency(&self, currency: DisplayCurrency) -> Option<f64> {
        match currency {
            DisplayCurrency::USD => Some(self.usd),
            DisplayCurrency::INR => self.inr,
        }
    }
}

/// Validated market quote for a single symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Symbol the quote belongs to.
    pub symbol: Symbol,
    /// Company name, when the source knows it.
    pub name: Option<String>,
    /// Last traded price (> 0).
    pub price: Priced,
    /// Session open.
    pub open: Priced,
    /// Session high (>= low).
    pub high: Priced,
    /// Session low.
    pub low: Priced,
    /// Previous session close.
    pub previous_close: Option<Priced>,
    /// Traded volume for the session.
    pub volume: u64,
    /// Absolute change against the previous close, in USD.
    pub change: f64,
    /// Relative change against the previous close, in percent.
    pub change_percent: f64,
    /// Listing currency reported by the source (informational).
    pub currency: Option<String>,
    /// Moment the quote was produced or received.
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// Decodes a response body for `requested`.
    ///
    /// `received_at` becomes the quote timestamp when the body carries none.
    pub fn from_json_slice(
        body: &[u8],
        requested: &Symbol,
        received_at: DateTime<Utc>,
    ) -> Result<Quote, FetchError> {
        let wire: WireQuote = serde_json::from_slice(body)?;
        wire.into_quote(requested, received_at)
    }
}

/// Raw quote object as sent by the quote source.
#[allow(missing_docs)]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireQuote {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "priceINR")]
    pub price_inr: Option<f64>,
    pub open: Option<f64>,
    #[serde(rename = "openINR")]
    pub open_inr: Option<f64>,
    pub high: Option<f64>,
    #[serde(rename = "highINR")]
    pub high_inr: Option<f64>,
    pub low: Option<f64>,
    #[serde(rename = "lowINR")]
    pub low_inr: Option<f64>,
    pub volume: Option<f64>,
    pub previous_close: Option<f64>,
    #[serde(rename = "previousCloseINR")]
    pub previous_close_inr: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub currency: Option<String>,
    pub timestamp: Option<String>,
}

impl WireQuote {
    /// Enforces the quote schema and builds a `Quote`.
    pub fn into_quote(
        self,
        requested: &Symbol,
        received_at: DateTime<Utc>,
    ) -> Result<Quote, FetchError> {
        let raw_symbol = self
            .symbol
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| FetchError::missing_field("symbol"))?;
        if !requested.matches(&raw_symbol) {
            return Err(FetchError::MalformedResponse(format!(
                "asked for {requested}, got {raw_symbol}"
            )));
        }

        let price = required(self.price, "price")?;
        if price <= 0.0 {
            return Err(FetchError::MalformedResponse(format!(
                "price must be positive, got {price}"
            )));
        }
        let open = required(self.open, "open")?;
        let high = required(self.high, "high")?;
        let low = required(self.low, "low")?;
        if high < low {
            return Err(FetchError::MalformedResponse(format!(
                "high {high} is below low {low}"
            )));
        }
        let volume = volume(required(self.volume, "volume")?)?;
        let change = required(self.change, "change")?;
        let change_percent = required(self.change_percent, "changePercent")?;

        let timestamp = match self.timestamp.as_deref() {
            Some(raw) => parse_timestamp(raw)?,
            None => received_at,
        };

        Ok(Quote {
            symbol: requested.clone(),
            name: self.name.filter(|n| !n.trim().is_empty()),
            price: Priced { usd: price, inr: finite(self.price_inr) },
            open: Priced { usd: open, inr: finite(self.open_inr) },
            high: Priced { usd: high, inr: finite(self.high_inr) },
            low: Priced { usd: low, inr: finite(self.low_inr) },
            previous_close: finite(self.previous_close).map(|usd| Priced {
                usd,
                inr: finite(self.previous_close_inr),
            }),
            volume,
            change,
            change_percent,
            currency: self.currency,
            timestamp,
        })
    }
}

fn required(value: Option<f64>, field: &str) -> Result<f64, FetchError> {
    match value {
        None => Err(FetchError::missing_field(field)),
        Some(v) if !v.is_finite() => Err(FetchError::MalformedResponse(format!(
            "field `{field}` is not a finite number"
        ))),
        Some(v) => Ok(v),
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn volume(raw: f64) -> Result<u64, FetchError> {
    if raw < 0.0 || raw.fract() != 0.0 || raw > u64::MAX as f64 {
        return Err(FetchError::MalformedResponse(format!(
            "volume must be a non-negative integer, got {raw}"
        )));
    }
    Ok(raw as u64)
}

/// Accepts RFC 3339 or a naive ISO-8601 date-time (taken as UTC).
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, FetchError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| FetchError::MalformedResponse(format!("bad timestamp {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;
    use chrono::TimeZone;
    use serde_json::json;

    fn aapl() -> Symbol {
        "AAPL".parse().unwrap()
    }

    fn received() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 15, 30, 0).unwrap()
    }

    fn full_body() -> serde_json::Value {
        json!({
            "symbol": "AAPL",
            "name": "Apple Inc.",
            "price": 150.0,
            "priceINR": 12450.0,
            "open": 151.2,
            "openINR": 12549.6,
            "high": 152.0,
            "highINR": 12616.0,
            "low": 149.5,
            "lowINR": 12408.5,
            "volume": 1250000,
            "previousClose": 151.2,
            "previousCloseINR": 12549.6,
            "change": -1.2,
            "changePercent": -0.79,
            "currency": "USD",
            "timestamp": "2024-03-01T15:29:58.123456"
        })
    }

    fn decode(body: serde_json::Value) -> Result<Quote, FetchError> {
        let bytes = serde_json::to_vec(&body).unwrap();
        Quote::from_json_slice(&bytes, &aapl(), received())
    }

    #[test]
    fn test_decode_full_body() {
        let quote = decode(full_body()).unwrap();
        assert_eq!(quote.symbol, aapl());
        assert_eq!(quote.name.as_deref(), Some("Apple Inc."));
        assert_eq!(quote.price, Priced::dual(150.0, 12450.0));
        assert_eq!(quote.low.inr, Some(12408.5));
        assert_eq!(quote.previous_close, Some(Priced::dual(151.2, 12549.6)));
        assert_eq!(quote.volume, 1_250_000);
        assert_eq!(quote.change, -1.2);
        assert_eq!(quote.change_percent, -0.79);
        assert_eq!(
            quote.timestamp.format("%H:%M:%S").to_string(),
            "15:29:58"
        );
    }

    #[test]
    fn test_decode_minimal_body_uses_receive_time() {
        let quote = decode(json!({
            "symbol": "aapl",
            "price": 150.0,
            "open": 150.0,
            "high": 150.0,
            "low": 150.0,
            "volume": 0,
            "change": 0.0,
            "changePercent": 0.0
        }))
        .unwrap();
        assert_eq!(quote.timestamp, received());
        assert_eq!(quote.price.inr, None);
        assert_eq!(quote.previous_close, None);
        assert_eq!(quote.volume, 0);
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        for field in ["symbol", "price", "open", "high", "low", "volume", "change", "changePercent"] {
            let mut body = full_body();
            body.as_object_mut().unwrap().remove(field);
            let err = decode(body).unwrap_err();
            assert_eq!(err, FetchError::missing_field(field), "field {field}");
        }
    }

    #[test]
    fn test_null_required_field_is_malformed() {
        let mut body = full_body();
        body["change"] = serde_json::Value::Null;
        assert_eq!(decode(body).unwrap_err(), FetchError::missing_field("change"));
    }

    #[test]
    fn test_non_numeric_field_is_malformed() {
        let mut body = full_body();
        body["price"] = json!("150.0");
        assert_eq!(decode(body).unwrap_err().kind(), FetchErrorKind::MalformedResponse);
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let mut body = full_body();
        body["price"] = json!(0.0);
        assert!(decode(body).is_err());
    }

    #[test]
    fn test_rejects_inverted_range() {
        let mut body = full_body();
        body["high"] = json!(140.0);
        assert!(decode(body).is_err());
    }

    #[test]
    fn test_price_outside_day_range_is_accepted() {
        let mut body = full_body();
        body["price"] = json!(160.0);
        assert_eq!(decode(body).unwrap().price.usd, 160.0);
    }

    #[test]
    fn test_rejects_fractional_or_negative_volume() {
        let mut body = full_body();
        body["volume"] = json!(12.5);
        assert!(decode(body).is_err());
        let mut body = full_body();
        body["volume"] = json!(-1);
        assert!(decode(body).is_err());
    }

    #[test]
    fn test_rejects_symbol_mismatch() {
        let mut body = full_body();
        body["symbol"] = json!("MSFT");
        assert_eq!(decode(body).unwrap_err().kind(), FetchErrorKind::MalformedResponse);
    }

    #[test]
    fn test_rfc3339_timestamp() {
        let mut body = full_body();
        body["timestamp"] = json!("2024-03-01T10:00:00+05:30");
        let quote = decode(body).unwrap();
        assert_eq!(quote.timestamp, Utc.with_ymd_and_hms(2024, 3, 1, 4, 30, 0).unwrap());
    }

    #[test]
    fn test_garbage_timestamp_is_malformed() {
        let mut body = full_body();
        body["timestamp"] = json!("yesterday");
        assert!(decode(body).is_err());
    }

    #[test]
    fn test_in_currency_picks_variant() {
        let priced = Priced::dual(10.0, 830.0);
        assert_eq!(priced.in_currency(DisplayCurrency::USD), Some(10.0));
        assert_eq!(priced.in_currency(DisplayCurrency::INR), Some(830.0));
        assert_eq!(Priced::usd(10.0).in_currency(DisplayCurrency::INR), None);
    }
}
