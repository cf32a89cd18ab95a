mod adapter;
mod parser;
mod rest;
mod session;
mod urls;

pub use adapter::VenueDAdapter;
pub use rest::VenueDListingProbe;

use async_trait::async_trait;
use eyre::Result;
use monitor_core::VenueAdapter;
use monitor_model::{MarketKind, Ticker, Venue};

pub struct VenueDAdapterFactory;

#[async_trait]
impl monitor_core::VenueAdapterFactory for VenueDAdapterFactory {
    fn accept(&self, venue: Venue) -> bool {
        venue == Venue::D
    }

    async fn build(&self, ticker: Ticker, markets: Vec<MarketKind>) -> Result<Box<dyn VenueAdapter>> {
        let mut adapter = VenueDAdapter::new(ticker);
        adapter.connect(&markets).await?;
        Ok(Box::new(adapter))
    }
}
