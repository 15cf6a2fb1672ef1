//! Shared networking constants and helpers for talking to the quote source.

/// Quote source used when neither `--api-url` nor `LIVE_PRICE_API_URL` is set.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
/// Interval between scheduled quote refreshes.
pub const POLL_INTERVAL_SECS: u64 = 30;
/// Upper bound for a single quote request.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
/// Ceiling for the exponential backoff policy.
pub const MAX_BACKOFF_SECS: u64 = 300;
/// Largest interval, timeout or backoff ceiling accepted from the command line.
pub const MAX_CONFIG_SECS: u64 = 86_400;
/// Quote bodies larger than this are rejected without being decoded.
pub const MAX_RESPONSE_BYTES: u64 = 64 * 1024;

/// Builds the live quote URL for `symbol` under `base_url`
/// (`http://host:5000` + `AAPL` → `http://host:5000/api/live/AAPL`).
pub fn quote_url(base_url: &str, symbol: &str) -> String {
    format!("{}/api/live/{}", base_url.trim_end_matches('/'), symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_url_strips_trailing_slash() {
        assert_eq!(
            quote_url("http://localhost:5000/", "TCS.NS"),
            "http://localhost:5000/api/live/TCS.NS"
        );
        assert_eq!(
            quote_url(DEFAULT_API_URL, "AAPL"),
            "http://127.0.0.1:5000/api/live/AAPL"
        );
    }
}
