//!
//! Common types and utilities shared by the live price client.
//!
//! This crate aggregates:
//! - `error` — `FetchError` for quote fetches and `LivePriceError` for everything else.
//! - `result` — handy `Result<T, LivePriceError>` alias.
//! - `symbol` — validated ticker symbols.
//! - `currency` — the USD/INR display selector.
//! - `quote` — the `Quote` model and its JSON wire decoding.
//! - `format` — number formatting with an explicit "N/A" for absent values.
//! - `display` — the pure presentation adapter (`derive`).
//! - `net` — quote source constants and URL helpers.
#![warn(missing_docs)]
pub mod currency;
pub mod display;
pub mod error;
pub mod format;
pub mod net;
pub mod quote;
pub mod result;
pub mod symbol;

pub use currency::DisplayCurrency;
pub use display::{derive, ChangeSign, DisplayModel, TickDirection};
pub use error::{FetchError, FetchErrorKind, LivePriceError};
pub use quote::{Priced, Quote};
pub use result::Result;
pub use symbol::Symbol;
