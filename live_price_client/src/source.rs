//! Quote source client.
//!
//! A `QuoteSource` answers one request for one symbol's current quote. It keeps no
//! state between calls and never retries: retry timing belongs to the poller.
use chrono::Utc;
use live_price_common::net::{MAX_RESPONSE_BYTES, quote_url};
use live_price_common::{FetchError, LivePriceError, Quote, Symbol};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use std::io::Read;
use std::time::Duration;

/// Something that can fetch the current quote of a symbol.
pub trait QuoteSource: Send + Sync {
    /// Fetches and validates the current quote for `symbol`.
    fn fetch_quote(&self, symbol: &Symbol) -> Result<Quote, FetchError>;
}

/// Quote source backed by the dashboard's HTTP API (`GET /api/live/{symbol}`).
pub struct HttpQuoteSource {
    client: Client,
    base_url: String,
}

impl HttpQuoteSource {
    /// Builds a client for `base_url` whose requests give up after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LivePriceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LivePriceError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim().to_string(),
        })
    }
}

impl QuoteSource for HttpQuoteSource {
    fn fetch_quote(&self, symbol: &Symbol) -> Result<Quote, FetchError> {
        let url = quote_url(&self.base_url, symbol.as_str());
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!("{url} answered {status}")));
        }

        if response
            .content_length()
            .is_some_and(|len| len > MAX_RESPONSE_BYTES)
        {
            return Err(oversized_body());
        }
        let mut body = Vec::new();
        response
            .take(MAX_RESPONSE_BYTES + 1)
            .read_to_end(&mut body)
            .map_err(|e| FetchError::Network(e.to_string()))?;
        if body.len() as u64 > MAX_RESPONSE_BYTES {
            return Err(oversized_body());
        }
        Quote::from_json_slice(&body, symbol, Utc::now())
    }
}

fn oversized_body() -> FetchError {
    FetchError::MalformedResponse(format!(
        "response body larger than {MAX_RESPONSE_BYTES} bytes"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use live_price_common::FetchErrorKind;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    const QUOTE_BODY: &str = r#"{"symbol":"AAPL","price":150.0,"priceINR":12450.0,"open":151.2,"high":152.0,"low":149.5,"volume":1250000,"change":-1.2,"changePercent":-0.79}"#;

    /// Serves exactly one HTTP response on a loopback port and hands back the
    /// request line it saw.
    fn serve_once(status: &'static str, body: impl Into<String>) -> (String, JoinHandle<String>) {
        let body = body.into();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }
            let mut stream = stream;
            // the client may hang up early on bodies it refuses
            let _ = write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.flush();
            request_line.trim_end().to_string()
        });
        (base_url, handle)
    }

    fn aapl() -> Symbol {
        "AAPL".parse().unwrap()
    }

    #[test]
    fn test_fetch_quote_success() {
        let (base_url, server) = serve_once("200 OK", QUOTE_BODY);
        let source = HttpQuoteSource::new(&base_url, Duration::from_secs(5)).unwrap();

        let quote = source.fetch_quote(&aapl()).unwrap();

        assert_eq!(server.join().unwrap(), "GET /api/live/AAPL HTTP/1.1");
        assert_eq!(quote.price.usd, 150.0);
        assert_eq!(quote.price.inr, Some(12450.0));
        assert_eq!(quote.volume, 1_250_000);
    }

    #[test]
    fn test_server_error_is_network_error() {
        let (base_url, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#);
        let source = HttpQuoteSource::new(&base_url, Duration::from_secs(5)).unwrap();

        let err = source.fetch_quote(&aapl()).unwrap_err();

        server.join().unwrap();
        assert_eq!(err.kind(), FetchErrorKind::Network);
    }

    #[test]
    fn test_partial_body_is_malformed() {
        let (base_url, server) = serve_once("200 OK", r#"{"symbol":"AAPL","price":150.0}"#);
        let source = HttpQuoteSource::new(&base_url, Duration::from_secs(5)).unwrap();

        let err = source.fetch_quote(&aapl()).unwrap_err();

        server.join().unwrap();
        assert_eq!(err, FetchError::missing_field("open"));
    }

    #[test]
    fn test_oversized_body_is_rejected() {
        let padding = " ".repeat(MAX_RESPONSE_BYTES as usize);
        let (base_url, server) = serve_once("200 OK", format!("{QUOTE_BODY}{padding}"));
        let source = HttpQuoteSource::new(&base_url, Duration::from_secs(5)).unwrap();

        let err = source.fetch_quote(&aapl()).unwrap_err();

        server.join().unwrap();
        assert_eq!(err, oversized_body());
    }

    #[test]
    fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let source = HttpQuoteSource::new(&base_url, Duration::from_secs(2)).unwrap();

        let err = source.fetch_quote(&aapl()).unwrap_err();

        assert_eq!(err.kind(), FetchErrorKind::Network);
    }
}
