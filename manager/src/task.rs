use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use monitor_core::{AdapterEvent, CallbackRegistry, VenueAdapter};
use monitor_model::{session_key, MarketKind, SessionState, Ticker, VenueId};
use monitor_store::PriceStore;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

/// Brief pause after an adapter's `next()` call errors out-of-band, so a
/// persistently failing adapter doesn't spin the task in a tight loop.
const ERROR_BACKOFF: Duration = Duration::from_millis(200);

pub enum Command {
    /// Extends the adapter's active market set; acks the result back so
    /// `start_monitoring` can record a per-venue failure without aborting
    /// the rest of the start.
    Connect(Vec<MarketKind>, oneshot::Sender<eyre::Result<()>>),
    Disconnect(Vec<MarketKind>),
    Reconnect(Vec<MarketKind>),
}

pub struct TaskHandle {
    pub commands: mpsc::UnboundedSender<Command>,
    pub join: tokio::task::JoinHandle<()>,
}

/// Spawns the task that owns one venue adapter for one ticker: drives its
/// `next()` event loop, forwards samples into the store and status changes
/// into both the session-state map and the status subscriber registry, and
/// serves `Command`s from the connection manager. The task exits once its
/// active market set is emptied by a `Disconnect` — this is the
/// cancellation path `StopMonitoring`/`EmergencyDisconnectAll` rely on.
pub fn spawn(
    ticker: Ticker,
    venue_id: VenueId,
    mut adapter: Box<dyn VenueAdapter>,
    initial_markets: Vec<MarketKind>,
    store: Arc<PriceStore>,
    sessions: Arc<DashMap<String, SessionState>>,
    status_registry: Arc<CallbackRegistry<SessionState>>,
) -> TaskHandle {
    let (tx, mut rx) = mpsc::unbounded_channel::<Command>();

    let join = tokio::spawn(async move {
        let mut active: HashSet<MarketKind> = initial_markets.into_iter().collect();

        loop {
            if active.is_empty() {
                break;
            }

            tokio::select! {
                biased;

                cmd = rx.recv() => {
                    match cmd {
                        Some(Command::Connect(markets, ack)) => {
                            let result = adapter.connect(&markets).await;
                            if result.is_ok() {
                                active.extend(markets);
                            }
                            let _ = ack.send(result);
                        }
                        Some(Command::Disconnect(markets)) => {
                            adapter.disconnect(&markets).await;
                            for market in &markets {
                                sessions.remove(&session_key(&ticker, &venue_id, *market));
                                active.remove(market);
                            }
                        }
                        Some(Command::Reconnect(markets)) => {
                            if let Err(e) = adapter.reconnect(&markets).await {
                                warn!(%ticker, %venue_id, %e, "explicit reconnect failed");
                            }
                        }
                        None => break,
                    }
                }

                event = adapter.next() => {
                    match event {
                        Ok(AdapterEvent::Sample(sample)) => store.update_price(sample),
                        Ok(AdapterEvent::Status(state)) => {
                            sessions.insert(state.key(), state.clone());
                            status_registry.notify_all(state);
                        }
                        Err(e) => {
                            warn!(%ticker, %venue_id, %e, "adapter event loop error");
                            tokio::time::sleep(ERROR_BACKOFF).await;
                        }
                    }
                }
            }
        }
    });

    TaskHandle { commands: tx, join }
}
