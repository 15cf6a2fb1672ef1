//! Text rendering of the live price card.
//!
//! The view holds no state of its own besides the display settings: it takes a
//! `PollSnapshot`, runs it through the presentation adapter and lays the result
//! out as text. Dark mode only changes the colour palette.
use crate::poller::{PollPhase, PollSnapshot};
use chrono::Local;
use live_price_common::display::tick_direction;
use live_price_common::{ChangeSign, DisplayCurrency, TickDirection, derive};
use std::fmt::Write;

/// Local, purely cosmetic display choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    /// Which precomputed price variant to show.
    pub currency: DisplayCurrency,
    /// Brighter palette for dark terminals.
    pub dark_mode: bool,
    /// Emit ANSI colours at all.
    pub color: bool,
}

struct Palette {
    gain: &'static str,
    loss: &'static str,
    muted: &'static str,
}

const LIGHT: Palette = Palette {
    gain: "\x1b[32m",
    loss: "\x1b[31m",
    muted: "\x1b[90m",
};

const DARK: Palette = Palette {
    gain: "\x1b[92m",
    loss: "\x1b[91m",
    muted: "\x1b[37m",
};

const RESET: &str = "\x1b[0m";

impl ViewSettings {
    fn paint(&self, text: &str, pick: impl Fn(&Palette) -> &'static str) -> String {
        if !self.color {
            return text.to_string();
        }
        let palette = if self.dark_mode { &DARK } else { &LIGHT };
        format!("{}{}{}", pick(palette), text, RESET)
    }
}

/// Renders the card for `snapshot`. Returns an empty string when no symbol is
/// tracked.
pub fn render(snapshot: &PollSnapshot, settings: &ViewSettings) -> String {
    let state = &snapshot.state;
    let Some(symbol) = &state.symbol else {
        return String::new();
    };

    let mut out = String::new();
    let loading = if snapshot.phase == PollPhase::Fetching {
        "  [refreshing...]"
    } else {
        ""
    };

    let Some(quote) = &state.latest_quote else {
        let _ = writeln!(out, "Live Price  {symbol}{loading}");
        let _ = writeln!(out, "  Loading live data...");
        if let Some(failure) = &state.last_error {
            let line = format!("  ! Last attempt failed: {}", failure.message);
            let _ = writeln!(out, "{}", settings.paint(&line, |p| p.loss));
        }
        return out;
    };

    let model = derive(quote, settings.currency);
    match &model.name {
        Some(name) => {
            let _ = writeln!(out, "Live Price  {} ({}){}", model.symbol, name, loading);
        }
        None => {
            let _ = writeln!(out, "Live Price  {}{}", model.symbol, loading);
        }
    }

    let change = format!(
        "{} {} ({})",
        model.change_sign.arrow(),
        model.change_percent_text,
        model.change_text
    );
    let change = match model.change_sign {
        ChangeSign::Positive => settings.paint(&change, |p| p.gain),
        ChangeSign::Negative => settings.paint(&change, |p| p.loss),
    };
    let tick = match tick_direction(state.previous_quote.as_ref(), quote) {
        Some(TickDirection::Up) => "  up since last refresh",
        Some(TickDirection::Down) => "  down since last refresh",
        Some(TickDirection::Unchanged) => "  unchanged since last refresh",
        None => "",
    };
    let _ = writeln!(out, "  {}  {}{}", model.price_text, change, tick);

    let _ = writeln!(
        out,
        "  {:<7}{:<16}{:<7}{}",
        "Open", model.open_text, "Volume", model.volume_text
    );
    let _ = writeln!(
        out,
        "  {:<7}{:<16}{:<7}{}",
        "High", model.high_text, "Low", model.low_text
    );
    let _ = writeln!(out, "  {:<7}{}", "Prev", model.previous_close_text);

    if let Some(updated) = state.last_fetch_at {
        let line = format!(
            "  Last updated: {}",
            updated.with_timezone(&Local).format("%H:%M:%S")
        );
        let _ = writeln!(out, "{}", settings.paint(&line, |p| p.muted));
    }
    if let Some(failure) = &state.last_error {
        let line = format!(
            "  ! Showing last known price; refresh failed at {}: {}",
            failure.at.with_timezone(&Local).format("%H:%M:%S"),
            failure.message
        );
        let _ = writeln!(out, "{}", settings.paint(&line, |p| p.loss));
    }
    out
}
