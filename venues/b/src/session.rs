use std::time::{Duration, Instant};

use common::ws::{Message, WsSession};
use monitor_core::Backoff;
use monitor_model::{MarketKind, SessionState, SessionStatus, Ticker, VenueId};
use tracing::{error, warn};

/// Spec §4.2.1/§5: connection attempt is bounded by a 5-second timeout; on
/// timeout the socket is closed and reconnection scheduled.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// One (venue, market) websocket session with its own reconnect budget.
/// Each venue crate owns its own copy of this shape rather than sharing one
/// from `monitor-core` — the four venues differ enough in subscribe/parse
/// behavior to keep this layer per-crate rather than shared.
pub struct MarketSession {
    pub market: MarketKind,
    pub url: String,
    pub ws: WsSession,
    pub backoff: Backoff,
    pub manual_disconnect: bool,
    pub terminal: bool,
    pub next_attempt_at: Option<Instant>,
    pub subscribe_frame: Option<Message>,
}

impl MarketSession {
    pub fn new(market: MarketKind, url: String, subscribe_frame: Option<Message>) -> Self {
        Self {
            market,
            url,
            ws: WsSession::new(),
            backoff: Backoff::new(),
            manual_disconnect: false,
            terminal: false,
            next_attempt_at: None,
            subscribe_frame,
        }
    }

    pub fn due(&self) -> bool {
        !self.manual_disconnect
            && !self.terminal
            && !self.ws.is_connected()
            && self.next_attempt_at.map_or(true, |at| Instant::now() >= at)
    }

    pub fn pending(&self) -> bool {
        !self.manual_disconnect && !self.terminal && !self.ws.is_connected()
    }

    pub async fn attempt_connect(&mut self, ticker: &Ticker, venue: VenueId) -> SessionState {
        use tokio_tungstenite::tungstenite::client::IntoClientRequest;

        let request = match self.url.as_str().into_client_request() {
            Ok(request) => request,
            Err(e) => return self.fail(ticker, venue, e.to_string()),
        };
        match tokio::time::timeout(CONNECT_TIMEOUT, WsSession::connect(request)).await {
            Ok(Ok(mut ws)) => {
                if let Some(frame) = self.subscribe_frame.clone() {
                    ws.send(frame).await;
                }
                self.ws = ws;
                self.backoff.reset();
                self.next_attempt_at = None;
                SessionState {
                    ticker: ticker.clone(),
                    venue,
                    market: self.market,
                    status: SessionStatus::Connected,
                    last_update: None,
                    error_message: None,
                    reconnect_attempt: 0,
                }
            }
            Ok(Err(e)) => self.fail(ticker, venue, e.to_string()),
            Err(_) => self.fail(ticker, venue, "connect timed out after 5s".to_string()),
        }
    }

    pub fn fail(&mut self, ticker: &Ticker, venue: VenueId, message: String) -> SessionState {
        let delay = self.backoff.next_delay();
        let attempt = self.backoff.attempt();
        if self.backoff.exhausted() {
            self.terminal = true;
            error!(%ticker, %venue, market = %self.market, "reconnect budget exhausted, entering terminal error state");
        } else {
            self.next_attempt_at = Some(Instant::now() + delay);
            warn!(%ticker, %venue, market = %self.market, attempt, ?delay, error = %message, "connect failed, scheduling retry");
        }
        SessionState {
            ticker: ticker.clone(),
            venue,
            market: self.market,
            status: SessionStatus::Error,
            last_update: None,
            error_message: Some(message),
            reconnect_attempt: attempt,
        }
    }

    pub fn manual_close_status(&self, ticker: &Ticker, venue: VenueId) -> SessionState {
        SessionState {
            ticker: ticker.clone(),
            venue,
            market: self.market,
            status: SessionStatus::Disconnected,
            last_update: None,
            error_message: None,
            reconnect_attempt: self.backoff.attempt(),
        }
    }
}
