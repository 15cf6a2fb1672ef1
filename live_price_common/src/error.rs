//! Error types shared between the common library and the client.
//!
//! Two families live here:
//! - `FetchError` — the only failures a quote fetch can produce. The poller treats
//!   every variant the same way (keep the last good quote, record, keep polling).
//! - `LivePriceError` — everything else the client can hit while wiring itself
//!   together (I/O, bad arguments, channels, threads).
use std::io;

use strum_macros::Display;
use thiserror::Error;

/// Failure of a single quote fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport failure: connection refused, timeout, non-success HTTP status.
    #[error("Network error: {0}")]
    Network(String),

    /// The response arrived but does not satisfy the quote schema.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Coarse classification of a `FetchError`, used in failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FetchErrorKind {
    /// See [`FetchError::Network`].
    Network,
    /// See [`FetchError::MalformedResponse`].
    MalformedResponse,
}

impl FetchError {
    /// Returns the kind of this error without its message.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::MalformedResponse(_) => FetchErrorKind::MalformedResponse,
        }
    }

    /// Shorthand for a missing or `null` required field.
    pub fn missing_field(field: &str) -> Self {
        FetchError::MalformedResponse(format!("missing required field `{field}`"))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedResponse(err.to_string())
    }
}

/// Unified error type for the client application.
#[derive(Error, Debug)]
pub enum LivePriceError {
    /// I/O error originating from the standard library (stdin, threads).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A ticker symbol could not be parsed from user input.
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// A command-line or interactive argument was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A quote fetch failed outside the poller (e.g. a one-shot fetch).
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Channel send failed (receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// A background thread panicked and could not be joined.
    #[error("Thread join failed: {0}")]
    ThreadJoin(String),
}
