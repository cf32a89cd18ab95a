use std::time::Duration;

use async_trait::async_trait;
use common::ws::Message;
use eyre::{eyre, Result};
use monitor_core::{AdapterEvent, VenueAdapter};
use monitor_model::{MarketKind, SessionState, SessionStatus, Ticker, Venue, VenueId};
use serde_json::json;

use crate::parser::parse_frame;
use crate::session::MarketSession;
use crate::urls::{derivative_symbol, spot_symbol, ws_url};

const VENUE: Venue = Venue::C;
const RECONNECT_POLL_INTERVAL: Duration = Duration::from_millis(200);

fn subscribe_frame(ticker: &Ticker, market: MarketKind) -> Message {
    let symbol = match market {
        MarketKind::Spot => spot_symbol(ticker),
        MarketKind::Derivative => derivative_symbol(ticker),
        MarketKind::OnChainAmm => unreachable!("venue C has no on-chain market"),
    };
    Message::Text(
        json!({
            "time": 0,
            "channel": "market.ticker",
            "event": "subscribe",
            "payload": [symbol],
        })
        .to_string(),
    )
}

/// The streaming adapter for venue C: both markets use the same
/// time/channel/event JSON envelope, with an explicit subscribe frame
/// required after connect. Venue C's derivative URL carries a
/// reproduced cut-and-paste bug; see `urls::ws_url`.
pub struct VenueCAdapter {
    ticker: Ticker,
    spot: Option<MarketSession>,
    derivative: Option<MarketSession>,
}

impl VenueCAdapter {
    pub fn new(ticker: Ticker) -> Self {
        Self {
            ticker,
            spot: None,
            derivative: None,
        }
    }

    fn session_mut(&mut self, market: MarketKind) -> Option<&mut MarketSession> {
        match market {
            MarketKind::Spot => self.spot.as_mut(),
            MarketKind::Derivative => self.derivative.as_mut(),
            MarketKind::OnChainAmm => None,
        }
    }

    fn session_ref(&self, market: MarketKind) -> Option<&MarketSession> {
        match market {
            MarketKind::Spot => self.spot.as_ref(),
            MarketKind::Derivative => self.derivative.as_ref(),
            MarketKind::OnChainAmm => None,
        }
    }

    fn handle_frame(&mut self, market: MarketKind, msg: Option<Message>) -> Option<AdapterEvent> {
        let venue = VenueId::Cex(VENUE);
        let ticker = self.ticker.clone();
        match msg {
            Some(Message::Text(text)) => {
                match parse_frame(&ticker, market, &text) {
                    Some(sample) => Some(AdapterEvent::Sample(sample)),
                    None => None,
                }
            }
            Some(Message::Ping(payload)) => {
                if let Some(session) = self.session_mut(market) {
                    session.ws.feed(Message::Pong(payload));
                }
                None
            }
            Some(_) => None,
            None => {
                if let Some(session) = self.session_mut(market) {
                    if !session.manual_disconnect {
                        session.ws.disconnect();
                        return Some(AdapterEvent::Status(SessionState {
                            ticker,
                            venue,
                            market,
                            status: SessionStatus::Disconnected,
                            last_update: None,
                            error_message: None,
                            reconnect_attempt: session.backoff.attempt(),
                        }));
                    }
                }
                None
            }
        }
    }
}

#[async_trait]
impl VenueAdapter for VenueCAdapter {
    async fn connect(&mut self, markets: &[MarketKind]) -> Result<()> {
        for &market in markets {
            let url = match market {
                MarketKind::Spot | MarketKind::Derivative => ws_url(market).to_string(),
                MarketKind::OnChainAmm => return Err(eyre!("venue C has no on-chain market")),
            };
            let frame = subscribe_frame(&self.ticker, market);
            let session = MarketSession::new(market, url, Some(frame));
            match market {
                MarketKind::Spot => self.spot = Some(session),
                MarketKind::Derivative => self.derivative = Some(session),
                MarketKind::OnChainAmm => unreachable!(),
            }
        }
        Ok(())
    }

    async fn disconnect(&mut self, markets: &[MarketKind]) {
        for &market in markets {
            if let Some(session) = self.session_mut(market) {
                session.manual_disconnect = true;
                session.ws.close().await;
            }
        }
    }

    async fn reconnect(&mut self, markets: &[MarketKind]) -> Result<()> {
        for &market in markets {
            if let Some(session) = self.session_mut(market) {
                session.manual_disconnect = false;
                session.terminal = false;
                session.backoff.reset();
                session.next_attempt_at = None;
            }
        }
        Ok(())
    }

    fn is_connected(&self, market: MarketKind) -> bool {
        self.session_ref(market).map_or(false, |s| s.ws.is_connected())
    }

    async fn next(&mut self) -> Result<AdapterEvent> {
        loop {
            if let Some(session) = self.spot.as_mut() {
                if session.due() {
                    let state = session.attempt_connect(&self.ticker, VenueId::Cex(VENUE)).await;
                    return Ok(AdapterEvent::Status(state));
                }
            }
            if let Some(session) = self.derivative.as_mut() {
                if session.due() {
                    let state = session.attempt_connect(&self.ticker, VenueId::Cex(VENUE)).await;
                    return Ok(AdapterEvent::Status(state));
                }
            }

            let spot_connected = self.spot.as_ref().map_or(false, |s| s.ws.is_connected());
            let deriv_connected = self.derivative.as_ref().map_or(false, |s| s.ws.is_connected());
            let any_pending =
                self.spot.as_ref().map_or(false, |s| s.pending()) || self.derivative.as_ref().map_or(false, |s| s.pending());

            if !spot_connected && !deriv_connected && !any_pending {
                return Err(eyre!("venue C adapter has no active or pending sessions"));
            }

            tokio::select! {
                msg = async { self.spot.as_mut().unwrap().ws.next().await }, if spot_connected => {
                    if let Some(event) = self.handle_frame(MarketKind::Spot, msg) {
                        return Ok(event);
                    }
                }
                msg = async { self.derivative.as_mut().unwrap().ws.next().await }, if deriv_connected => {
                    if let Some(event) = self.handle_frame(MarketKind::Derivative, msg) {
                        return Ok(event);
                    }
                }
                _ = tokio::time::sleep(RECONNECT_POLL_INTERVAL), if any_pending => {
                    continue;
                }
            }
        }
    }
}
