use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::{MarketKind, Ticker, Time, VenueId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SessionStatus {
    Connecting,
    Connected,
    Disconnected,
    Error,
}

/// Mirrors one adapter's lifecycle for a single (ticker, venue, market).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub ticker: Ticker,
    pub venue: VenueId,
    pub market: MarketKind,
    pub status: SessionStatus,
    pub last_update: Option<Time>,
    pub error_message: Option<String>,
    pub reconnect_attempt: u32,
}

impl SessionState {
    pub fn initial(ticker: Ticker, venue: VenueId, market: MarketKind) -> Self {
        Self {
            ticker,
            venue,
            market,
            status: SessionStatus::Connecting,
            last_update: None,
            error_message: None,
            reconnect_attempt: 0,
        }
    }

    /// Opaque key used by the connection manager: `ticker|venue|market`.
    pub fn key(&self) -> String {
        format!("{}|{}|{}", self.ticker, self.venue, self.market)
    }
}

pub fn session_key(ticker: &Ticker, venue: &VenueId, market: MarketKind) -> String {
    format!("{ticker}|{venue}|{market}")
}
