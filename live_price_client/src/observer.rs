//! Failure reporting for the poller.
use chrono::{DateTime, Utc};
use live_price_common::{FetchErrorKind, Symbol};
use log::warn;

/// One failed fetch, as seen by the poller.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureReport {
    /// Symbol the fetch was for.
    pub symbol: Symbol,
    /// Network or malformed response.
    pub kind: FetchErrorKind,
    /// Human-readable error text.
    pub message: String,
    /// When the failed fetch completed.
    pub occurred_at: DateTime<Utc>,
    /// Length of the current failure run, including this one.
    pub consecutive_failures: u32,
}

/// Receives failure notifications. The poller does not act on anything an
/// observer does.
pub trait FailureObserver: Send {
    /// Called once per failed fetch that the poller accepted.
    fn on_fetch_failure(&self, report: &FailureReport);
}

/// Writes failures to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl FailureObserver for LogObserver {
    fn on_fetch_failure(&self, report: &FailureReport) {
        warn!(
            "Failed to fetch live price for {} ({}, {} in a row) at {}: {}",
            report.symbol,
            report.kind,
            report.consecutive_failures,
            report.occurred_at.format("%H:%M:%S"),
            report.message
        );
    }
}
