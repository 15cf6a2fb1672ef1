//! Live price client library.
//!
//! The binary in `main.rs` wires these modules together:
//! - `source` — `QuoteSource` trait and the HTTP quote client.
//! - `poller` — the polling state machine and its `PollState`.
//! - `backoff` — timer spacing policies plugged into the poller.
//! - `observer` — failure notifications (logged by default).
//! - `runtime` — `PollerHandle`, which drives a poller on its own thread.
//! - `view` — text rendering of poll snapshots.
//! - `command` — interactive commands read from stdin.
//! - `args` — command-line arguments.
#![warn(missing_docs)]
pub mod args;
pub mod backoff;
pub mod command;
pub mod observer;
pub mod poller;
pub mod runtime;
pub mod source;
pub mod view;
