//! Live Price Client — a terminal card that keeps one stock quote fresh.
//!
//! It polls the dashboard's quote API for the tracked symbol every 30 seconds (or
//! `--interval-secs`), shows the price in USD or INR, and keeps showing the last
//! good quote with a warning when a refresh fails. Commands typed on stdin switch
//! symbol, currency, dark mode or force a refresh; see `command::HELP`.
//!
//! Usage example (CLI):
//! ```bash
//! live_price_client --api-url http://192.168.0.10:5000 --symbol AAPL --currency inr
//! ```
//!
//! Logs go to stderr (`RUST_LOG=debug` for poller transitions), the card to stdout.
use chrono::Utc;
use clap::Parser;
use crossbeam_channel::{Receiver, bounded, never, select, unbounded};
use live_price_client::args::Args;
use live_price_client::command::{HELP, UserCommand};
use live_price_client::observer::LogObserver;
use live_price_client::poller::{PollPhase, PollSnapshot, PollState, Poller};
use live_price_client::runtime::PollerHandle;
use live_price_client::source::{HttpQuoteSource, QuoteSource};
use live_price_client::view::{self, ViewSettings};
use live_price_common::{LivePriceError, Result, Symbol};
use log::{error, info, warn};
use std::io::{self, BufRead, IsTerminal};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), LivePriceError> {
    init_logger();
    let args = Args::parse();

    let source = Arc::new(HttpQuoteSource::new(
        &args.api_url,
        Duration::from_secs(args.timeout_secs),
    )?);
    let mut settings = ViewSettings {
        currency: args.currency,
        dark_mode: args.dark_mode,
        color: io::stdout().is_terminal(),
    };

    if args.once {
        return print_once(source.as_ref(), args.symbol, &settings);
    }

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| LivePriceError::Io(io::Error::other(e)))?;

    let poller = Poller::new(
        Duration::from_secs(args.interval_secs),
        args.backoff.build(Duration::from_secs(args.max_backoff_secs)),
        Box::new(LogObserver),
    );
    let handle = PollerHandle::spawn(poller, source)?;
    info!("Using quote API at {}", args.api_url);

    match args.symbol {
        Some(symbol) => handle.bind(symbol)?,
        None => println!("No symbol tracked yet. Type `s <SYMBOL>` to start, `h` for help."),
    }

    let stdin_rx = spawn_input_reader()?;
    let closed_rx = never::<String>();
    let mut stdin_open = true;
    let mut last: Option<PollSnapshot> = None;

    loop {
        let input = if stdin_open { &stdin_rx } else { &closed_rx };
        select! {
            recv(shutdown_rx) -> _ => {
                info!("Ctrl+C received. Shutting down client...");
                break;
            },
            recv(handle.snapshots()) -> msg => match msg {
                Ok(snapshot) => {
                    draw(&snapshot, &settings);
                    last = Some(snapshot);
                }
                Err(e) => {
                    error!("Poller stopped unexpectedly: {}", e);
                    break;
                }
            },
            recv(input) -> line => {
                let Ok(line) = line else {
                    info!("stdin closed; Ctrl+C to exit");
                    stdin_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<UserCommand>() {
                    Ok(UserCommand::Quit) => break,
                    Ok(UserCommand::Refresh) => handle.refresh()?,
                    Ok(UserCommand::Symbol(symbol)) => handle.bind(symbol)?,
                    Ok(UserCommand::Clear) => handle.clear()?,
                    Ok(UserCommand::ToggleCurrency) => {
                        settings.currency = settings.currency.toggle();
                        redraw(last.as_ref(), &settings);
                    }
                    Ok(UserCommand::Currency(currency)) => {
                        settings.currency = currency;
                        redraw(last.as_ref(), &settings);
                    }
                    Ok(UserCommand::ToggleDarkMode) => {
                        settings.dark_mode = !settings.dark_mode;
                        redraw(last.as_ref(), &settings);
                    }
                    Ok(UserCommand::Help) => println!("{HELP}"),
                    Err(e) => warn!("{}", e),
                }
            },
        }
    }

    handle.shutdown()
}

/// One-shot mode: fetch, render, exit. Fetch errors become the exit error.
fn print_once(
    source: &dyn QuoteSource,
    symbol: Option<Symbol>,
    settings: &ViewSettings,
) -> Result<(), LivePriceError> {
    let symbol = symbol
        .ok_or_else(|| LivePriceError::InvalidArgument("--once needs --symbol".into()))?;
    let quote = source.fetch_quote(&symbol)?;
    let snapshot = PollSnapshot {
        phase: PollPhase::Scheduled,
        state: PollState {
            symbol: Some(symbol),
            latest_quote: Some(quote),
            last_fetch_at: Some(Utc::now()),
            ..PollState::default()
        },
    };
    print!("{}", view::render(&snapshot, settings));
    Ok(())
}

fn draw(snapshot: &PollSnapshot, settings: &ViewSettings) {
    let card = view::render(snapshot, settings);
    if settings.color {
        // clear screen, cursor home
        print!("\x1b[2J\x1b[H");
    }
    if card.is_empty() {
        println!("No symbol tracked. Type `s <SYMBOL>` to start.");
    } else {
        println!("{card}");
    }
}

fn redraw(last: Option<&PollSnapshot>, settings: &ViewSettings) {
    if let Some(snapshot) = last {
        draw(snapshot, settings);
    }
}

/// Forwards stdin lines to a channel until EOF.
fn spawn_input_reader() -> Result<Receiver<String>> {
    let (tx, rx) = unbounded::<String>();
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
