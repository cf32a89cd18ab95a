mod adapter;
mod parser;
mod rest;
mod session;
mod urls;

pub use adapter::VenueAAdapter;
pub use rest::VenueAListingProbe;

use async_trait::async_trait;
use eyre::Result;
use monitor_core::VenueAdapter;
use monitor_model::{MarketKind, Ticker, Venue};

pub struct VenueAAdapterFactory;

#[async_trait]
impl monitor_core::VenueAdapterFactory for VenueAAdapterFactory {
    fn accept(&self, venue: Venue) -> bool {
        venue == Venue::A
    }

    async fn build(&self, ticker: Ticker, markets: Vec<MarketKind>) -> Result<Box<dyn VenueAdapter>> {
        let mut adapter = VenueAAdapter::new(ticker);
        adapter.connect(&markets).await?;
        Ok(Box::new(adapter))
    }
}
