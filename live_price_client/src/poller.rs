//! Live price poller state machine.
//!
//! The poller is a plain value that owns a `PollState` and decides *when* a fetch
//! should happen; it never performs I/O itself. Callers feed it events (bind,
//! clear, timer, refresh, completion, teardown) together with the current time and
//! receive `FetchTicket`s for fetches they must run. `runtime` drives it from a
//! dedicated thread.
//!
//! Phases:
//!
//! ```text
//! Idle --bind--> Fetching --complete--> Scheduled --timer/refresh--> Fetching
//!   ^                                       |
//!   +-------------- clear / teardown -------+
//! ```
//!
//! Invariants:
//! - at most one fetch is in flight; ticks and refreshes while `Fetching` are no-ops;
//! - every ticket carries the epoch it was issued in; `bind`, `clear` and
//!   `teardown` start a new epoch, so completions from older epochs are discarded;
//! - a failed fetch never touches `latest_quote`;
//! - after `teardown` nothing is written any more.
use crate::backoff::Backoff;
use crate::observer::{FailureObserver, FailureReport};
use chrono::{DateTime, Utc};
use live_price_common::{FetchError, FetchErrorKind, Quote, Symbol};
use log::{debug, info};
use std::time::{Duration, Instant};
use strum::Display;

/// Lifecycle phase of a poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PollPhase {
    /// No symbol bound, timer disarmed.
    Idle,
    /// Timer armed, no fetch outstanding.
    Scheduled,
    /// A fetch is outstanding.
    Fetching,
}

/// Last fetch error, kept next to the stale quote it failed to replace.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    /// Network or malformed response.
    pub kind: FetchErrorKind,
    /// Human-readable error text.
    pub message: String,
    /// When the failed fetch completed.
    pub at: DateTime<Utc>,
}

/// State owned by one poller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollState {
    /// Currently tracked symbol.
    pub symbol: Option<Symbol>,
    /// Last successfully fetched quote.
    pub latest_quote: Option<Quote>,
    /// The quote `latest_quote` replaced, for tick comparisons.
    pub previous_quote: Option<Quote>,
    /// Whether a fetch is outstanding.
    pub is_fetching: bool,
    /// Completion time of the last successful fetch.
    pub last_fetch_at: Option<DateTime<Utc>>,
    /// Error of the last fetch, cleared by the next success.
    pub last_error: Option<FetchFailure>,
    /// Failed fetches since the last success.
    pub consecutive_failures: u32,
}

/// Immutable copy of a poller's state handed to the view.
#[derive(Debug, Clone, PartialEq)]
pub struct PollSnapshot {
    /// Phase at the time of the snapshot.
    pub phase: PollPhase,
    /// State at the time of the snapshot.
    pub state: PollState,
}

/// Permission to run one fetch; handed back to [`Poller::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    symbol: Symbol,
    epoch: u64,
    seq: u64,
}

impl FetchTicket {
    /// Symbol to fetch.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }
}

/// What [`Poller::complete`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was written into the poll state.
    Applied,
    /// The ticket belongs to an older binding, or the poller was torn down.
    Stale,
}

/// Timer-driven quote poller for one symbol at a time.
pub struct Poller {
    state: PollState,
    phase: PollPhase,
    interval: Duration,
    backoff: Box<dyn Backoff>,
    observer: Box<dyn FailureObserver>,
    epoch: u64,
    next_seq: u64,
    in_flight: Option<u64>,
    next_due: Option<Instant>,
    torn_down: bool,
}

impl Poller {
    /// Creates an idle poller.
    pub fn new(
        interval: Duration,
        backoff: Box<dyn Backoff>,
        observer: Box<dyn FailureObserver>,
    ) -> Self {
        Self {
            state: PollState::default(),
            phase: PollPhase::Idle,
            interval,
            backoff,
            observer,
            epoch: 0,
            next_seq: 0,
            in_flight: None,
            next_due: None,
            torn_down: false,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    /// Read-only view of the state.
    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Base interval between scheduled fetches.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the timer fires next; `None` while idle.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Whether `teardown` has been called.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Copies the current state for readers.
    pub fn snapshot(&self) -> PollSnapshot {
        PollSnapshot {
            phase: self.phase,
            state: self.state.clone(),
        }
    }

    /// Starts tracking `symbol`: drops everything known about the previous
    /// binding, arms the timer and returns the ticket for the immediate fetch.
    ///
    /// A fetch issued for the previous binding is not cancelled, even when it is
    /// for the same symbol: it keeps running but only the new ticket is tracked,
    /// and the old result is discarded on completion.
    ///
    /// Returns `None` once the poller is torn down.
    pub fn bind(&mut self, symbol: Symbol, now: Instant) -> Option<FetchTicket> {
        if self.torn_down {
            return None;
        }
        info!("Tracking {} every {:?}", symbol, self.interval);
        self.reset();
        self.state.symbol = Some(symbol);
        self.next_due = Some(deadline(now, self.interval));
        self.issue()
    }

    /// Stops tracking the current symbol and disarms the timer.
    pub fn clear(&mut self) {
        if self.torn_down {
            return;
        }
        if let Some(symbol) = &self.state.symbol {
            info!("Stopped tracking {}", symbol);
        }
        self.reset();
    }

    /// Handles the timer. Re-arms it and returns a ticket unless a fetch is
    /// already in flight or the deadline has not been reached.
    pub fn on_timer(&mut self, now: Instant) -> Option<FetchTicket> {
        let due = self.next_due?;
        if now < due {
            return None;
        }

        let delay = self
            .backoff
            .delay(self.interval, self.state.consecutive_failures);
        let mut next = deadline(due, delay);
        if next <= now {
            // the loop fell behind; skip missed ticks instead of bursting
            next = deadline(now, delay);
        }
        self.next_due = Some(next);

        self.trigger("timer")
    }

    /// Manual refresh: one tick without waiting, same in-flight guard.
    /// Leaves the timer deadline untouched.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        self.trigger("manual refresh")
    }

    /// Applies the result of the fetch identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Quote, FetchError>,
        at: DateTime<Utc>,
    ) -> Completion {
        let current = !self.torn_down
            && ticket.epoch == self.epoch
            && self.in_flight == Some(ticket.seq)
            && self.state.symbol.as_ref() == Some(&ticket.symbol);
        if !current {
            debug!(
                "Discarding stale result for {} (epoch {}, current {})",
                ticket.symbol, ticket.epoch, self.epoch
            );
            return Completion::Stale;
        }

        self.in_flight = None;
        self.state.is_fetching = false;
        self.phase = PollPhase::Scheduled;

        match result {
            Ok(quote) => {
                debug!("{} = {:.2}", ticket.symbol, quote.price.usd);
                self.state.previous_quote = self.state.latest_quote.replace(quote);
                self.state.last_fetch_at = Some(at);
                self.state.last_error = None;
                self.state.consecutive_failures = 0;
            }
            Err(err) => {
                self.state.consecutive_failures = self.state.consecutive_failures.saturating_add(1);
                let failure = FetchFailure {
                    kind: err.kind(),
                    message: err.to_string(),
                    at,
                };
                self.observer.on_fetch_failure(&FailureReport {
                    symbol: ticket.symbol,
                    kind: failure.kind,
                    message: failure.message.clone(),
                    occurred_at: at,
                    consecutive_failures: self.state.consecutive_failures,
                });
                self.state.last_error = Some(failure);
            }
        }
        Completion::Applied
    }

    /// Disarms the timer and stops all further state writes.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        debug!("Poller torn down");
        self.reset();
        self.torn_down = true;
    }

    fn reset(&mut self) {
        self.epoch += 1;
        self.state = PollState::default();
        self.phase = PollPhase::Idle;
        self.in_flight = None;
        self.next_due = None;
    }

    fn trigger(&mut self, cause: &str) -> Option<FetchTicket> {
        if self.torn_down || self.state.symbol.is_none() {
            return None;
        }
        if self.phase == PollPhase::Fetching {
            debug!("Skipping {}: fetch already in flight", cause);
            return None;
        }
        debug!("Fetch triggered by {}", cause);
        self.issue()
    }

    fn issue(&mut self) -> Option<FetchTicket> {
        let symbol = self.state.symbol.clone()?;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight = Some(seq);
        self.state.is_fetching = true;
        self.phase = PollPhase::Fetching;
        Some(FetchTicket {
            symbol,
            epoch: self.epoch,
            seq,
        })
    }
}

/// Longest delay a timer deadline is armed with.
const MAX_TIMER_DELAY: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// `from + delay`, with `delay` clamped so the addition cannot overflow.
fn deadline(from: Instant, delay: Duration) -> Instant {
    from.checked_add(delay.min(MAX_TIMER_DELAY)).unwrap_or(from)
}
