use async_trait::async_trait;
use eyre::Result;

use monitor_model::{MarketKind, PriceSample, SessionState, Ticker, Venue};

/// One event pulled from a venue adapter's internal loop: either a fresh
/// price observation or a session-state transition to report upstream.
#[derive(Debug, Clone)]
pub enum AdapterEvent {
    Sample(PriceSample),
    Status(SessionState),
}

/// The capability set every venue integration needs: connect/disconnect/
/// reconnect per market, connectivity query, and a pull-style event loop.
/// Both the streaming (websocket) and polling (on-chain) variants implement
/// this same trait; they share almost nothing else.
#[async_trait]
pub trait VenueAdapter: Send {
    async fn connect(&mut self, markets: &[MarketKind]) -> Result<()>;
    async fn disconnect(&mut self, markets: &[MarketKind]);
    async fn reconnect(&mut self, markets: &[MarketKind]) -> Result<()>;
    fn is_connected(&self, market: MarketKind) -> bool;

    /// Drives the adapter forward and returns the next sample or status
    /// change. The connection manager calls this in a loop per adapter task.
    async fn next(&mut self) -> Result<AdapterEvent>;
}

/// One factory per venue family, asked in turn which venues it can serve.
#[async_trait]
pub trait VenueAdapterFactory: Send + Sync {
    fn accept(&self, venue: Venue) -> bool;
    async fn build(&self, ticker: Ticker, markets: Vec<MarketKind>) -> Result<Box<dyn VenueAdapter>>;
}

#[derive(Debug, Clone, Default)]
pub struct ListingStatus {
    pub spot: bool,
    pub futures: bool,
    pub symbol: String,
}

/// Issues the REST listing calls for one venue; separate from
/// `VenueAdapter` since discovery calls this before any adapter is
/// constructed.
#[async_trait]
pub trait ListingProbe: Send + Sync {
    fn venue(&self) -> Venue;
    async fn check_listing(&self, ticker: &Ticker) -> ListingStatus;
}
