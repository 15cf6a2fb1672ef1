//! Command-line arguments for the live price client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use crate::backoff::BackoffKind;
use clap::Parser;
use live_price_common::net::{
    DEFAULT_API_URL, MAX_BACKOFF_SECS, MAX_CONFIG_SECS, POLL_INTERVAL_SECS, REQUEST_TIMEOUT_SECS,
};
use live_price_common::{DisplayCurrency, Symbol};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Symbol to start tracking right away (e.g. AAPL, RELIANCE.NS).
    #[clap(long)]
    pub symbol: Option<Symbol>,

    /// Base URL of the quote API.
    #[clap(long, env = "LIVE_PRICE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Currency to display prices in.
    #[clap(long, value_enum, default_value_t = DisplayCurrency::USD)]
    pub currency: DisplayCurrency,

    /// Use the palette for dark terminals.
    #[clap(long)]
    pub dark_mode: bool,

    /// Seconds between scheduled refreshes.
    #[clap(long, default_value_t = POLL_INTERVAL_SECS, value_parser = clap::value_parser!(u64).range(1..=MAX_CONFIG_SECS))]
    pub interval_secs: u64,

    /// Seconds before a quote request is abandoned.
    #[clap(long, default_value_t = REQUEST_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=MAX_CONFIG_SECS))]
    pub timeout_secs: u64,

    /// Spacing of refreshes after consecutive failures.
    #[clap(long, value_enum, default_value_t = BackoffKind::Fixed)]
    pub backoff: BackoffKind,

    /// Longest delay the exponential backoff may reach, in seconds.
    #[clap(long, default_value_t = MAX_BACKOFF_SECS, value_parser = clap::value_parser!(u64).range(1..=MAX_CONFIG_SECS))]
    pub max_backoff_secs: u64,

    /// Fetch the quote for --symbol once, print it and exit.
    #[clap(long, requires = "symbol")]
    pub once: bool,
}
