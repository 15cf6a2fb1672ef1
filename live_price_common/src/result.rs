//! Result type alias shared across the workspace.
//!
//! Functions in the client return `Result<T>` and get `LivePriceError` by default.
//! Quote fetches spell out `Result<Quote, FetchError>` instead.
use crate::error::LivePriceError;

/// Workspace-wide `Result` alias with `LivePriceError` as the default error.
pub type Result<T, E = LivePriceError> = std::result::Result<T, E>;
