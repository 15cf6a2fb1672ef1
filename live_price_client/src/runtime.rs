//! Threaded driver for a `Poller`.
//!
//! `PollerHandle::spawn` moves a poller onto its own thread, which is the only
//! place its state is ever mutated. That thread multiplexes three inputs with
//! crossbeam `select!`:
//!
//! - control messages from the view (`bind`, `clear`, `refresh`, shutdown);
//! - completions of fetches, each of which runs on a short-lived worker thread;
//! - the poller's timer deadline (`crossbeam_channel::at`).
//!
//! After every event the thread publishes a fresh `PollSnapshot`. Dropping the
//! handle (or calling `shutdown`) tears the poller down and joins the thread; a
//! worker that finishes afterwards finds the completion channel closed and its
//! result is dropped.
use crate::poller::{Completion, FetchTicket, PollSnapshot, Poller};
use crate::source::QuoteSource;
use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, Sender, at, never, select, unbounded};
use live_price_common::{FetchError, LivePriceError, Quote, Result, Symbol};
use log::{debug, error, info};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

enum Control {
    Bind(Symbol),
    Clear,
    Refresh,
    Shutdown,
}

struct Completed {
    ticket: FetchTicket,
    result: std::result::Result<Quote, FetchError>,
    at: DateTime<Utc>,
}

/// Owner of a running poller thread. Releases the timer and the thread on drop.
pub struct PollerHandle {
    control_tx: Sender<Control>,
    snapshots: Receiver<PollSnapshot>,
    thread: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Starts driving `poller`, fetching through `source`.
    pub fn spawn(poller: Poller, source: Arc<dyn QuoteSource>) -> Result<Self> {
        let (control_tx, control_rx) = unbounded::<Control>();
        let (snapshot_tx, snapshots) = unbounded::<PollSnapshot>();

        let thread = thread::Builder::new()
            .name("live-price-poller".into())
            .spawn(move || run(poller, source, control_rx, snapshot_tx))?;

        Ok(Self {
            control_tx,
            snapshots,
            thread: Some(thread),
        })
    }

    /// Tracks `symbol`, replacing whatever was tracked before.
    pub fn bind(&self, symbol: Symbol) -> Result<()> {
        self.send(Control::Bind(symbol))
    }

    /// Stops tracking the current symbol.
    pub fn clear(&self) -> Result<()> {
        self.send(Control::Clear)
    }

    /// Requests an immediate fetch; ignored while one is in flight.
    pub fn refresh(&self) -> Result<()> {
        self.send(Control::Refresh)
    }

    /// Snapshots published after every state change.
    pub fn snapshots(&self) -> &Receiver<PollSnapshot> {
        &self.snapshots
    }

    /// Tears the poller down and waits for its thread.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        // the thread may already be gone if it panicked
        let _ = self.control_tx.send(Control::Shutdown);
        thread
            .join()
            .map_err(|_| LivePriceError::ThreadJoin("live-price-poller panicked".into()))
    }

    fn send(&self, control: Control) -> Result<()> {
        self.control_tx
            .send(control)
            .map_err(|e| LivePriceError::ChannelSend(format!("poller control: {e}")))
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!("Failed to stop poller: {}", e);
        }
    }
}

fn run(
    mut poller: Poller,
    source: Arc<dyn QuoteSource>,
    control_rx: Receiver<Control>,
    snapshot_tx: Sender<PollSnapshot>,
) {
    let (done_tx, done_rx) = unbounded::<Completed>();
    info!("Poller started (interval {:?})", poller.interval());

    loop {
        let timer = match poller.next_due() {
            Some(due) => at(due),
            None => never(),
        };

        select! {
            recv(control_rx) -> msg => match msg {
                Ok(Control::Bind(symbol)) => {
                    let ticket = poller.bind(symbol, Instant::now());
                    dispatch(&mut poller, ticket, &source, &done_tx);
                }
                Ok(Control::Refresh) => {
                    let ticket = poller.refresh();
                    dispatch(&mut poller, ticket, &source, &done_tx);
                }
                Ok(Control::Clear) => poller.clear(),
                Ok(Control::Shutdown) | Err(_) => {
                    poller.teardown();
                    let _ = snapshot_tx.send(poller.snapshot());
                    break;
                }
            },
            recv(done_rx) -> msg => {
                let Ok(done) = msg else { continue };
                if poller.complete(done.ticket, done.result, done.at) == Completion::Stale {
                    continue;
                }
            },
            recv(timer) -> _ => {
                let ticket = poller.on_timer(Instant::now());
                dispatch(&mut poller, ticket, &source, &done_tx);
            },
        }

        if snapshot_tx.send(poller.snapshot()).is_err() {
            debug!("Snapshot receiver gone");
        }
    }
    info!("Poller stopped");
}

/// Runs the fetch for `ticket` on a worker thread.
fn dispatch(
    poller: &mut Poller,
    ticket: Option<FetchTicket>,
    source: &Arc<dyn QuoteSource>,
    done_tx: &Sender<Completed>,
) {
    let Some(ticket) = ticket else { return };
    let worker_ticket = ticket.clone();
    let source = Arc::clone(source);
    let done_tx = done_tx.clone();

    let spawned = thread::Builder::new()
        .name(format!("fetch-{}", ticket.symbol()))
        .spawn(move || {
            let result = source.fetch_quote(worker_ticket.symbol());
            let completed = Completed {
                ticket: worker_ticket,
                result,
                at: Utc::now(),
            };
            if done_tx.send(completed).is_err() {
                debug!("Poller gone, dropping fetch result");
            }
        });

    if let Err(e) = spawned {
        error!("Failed to start fetch worker: {}", e);
        poller.complete(
            ticket,
            Err(FetchError::Network(format!("could not start fetch: {e}"))),
            Utc::now(),
        );
    }
}
