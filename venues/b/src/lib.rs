mod adapter;
mod parser;
mod rest;
mod session;
mod urls;

pub use adapter::VenueBAdapter;
pub use rest::VenueBListingProbe;

use async_trait::async_trait;
use eyre::Result;
use monitor_core::VenueAdapter;
use monitor_model::{MarketKind, Ticker, Venue};

pub struct VenueBAdapterFactory;

#[async_trait]
impl monitor_core::VenueAdapterFactory for VenueBAdapterFactory {
    fn accept(&self, venue: Venue) -> bool {
        venue == Venue::B
    }

    async fn build(&self, ticker: Ticker, markets: Vec<MarketKind>) -> Result<Box<dyn VenueAdapter>> {
        let mut adapter = VenueBAdapter::new(ticker);
        adapter.connect(&markets).await?;
        Ok(Box::new(adapter))
    }
}
