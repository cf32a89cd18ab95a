mod adapter;
mod parser;
mod rest;
mod session;
mod urls;

pub use adapter::VenueCAdapter;
pub use rest::VenueCListingProbe;

use async_trait::async_trait;
use eyre::Result;
use monitor_core::VenueAdapter;
use monitor_model::{MarketKind, Ticker, Venue};

pub struct VenueCAdapterFactory;

#[async_trait]
impl monitor_core::VenueAdapterFactory for VenueCAdapterFactory {
    fn accept(&self, venue: Venue) -> bool {
        venue == Venue::C
    }

    async fn build(&self, ticker: Ticker, markets: Vec<MarketKind>) -> Result<Box<dyn VenueAdapter>> {
        let mut adapter = VenueCAdapter::new(ticker);
        adapter.connect(&markets).await?;
        Ok(Box::new(adapter))
    }
}
