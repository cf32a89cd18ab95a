use std::sync::Arc;

use dashmap::DashMap;
use eyre::{bail, Result};
use monitor_core::{VenueAdapter, VenueAdapterFactory};
use monitor_model::{Chain, MarketKind, Ticker, Venue};
use monitor_onchain::{parse_pool_address, OnChainAdapter, WrappedNativeCache};
use monitor_venue_a::VenueAAdapterFactory;
use monitor_venue_b::VenueBAdapterFactory;
use monitor_venue_c::VenueCAdapterFactory;
use monitor_venue_d::VenueDAdapterFactory;

/// Routes a venue to its adapter factory. Each factory's `build` already
/// connects the requested markets before returning.
pub struct CexFactories {
    factories: Vec<Box<dyn VenueAdapterFactory>>,
}

impl CexFactories {
    pub fn new() -> Self {
        Self {
            factories: vec![
                Box::new(VenueAAdapterFactory),
                Box::new(VenueBAdapterFactory),
                Box::new(VenueCAdapterFactory),
                Box::new(VenueDAdapterFactory),
            ],
        }
    }

    pub async fn build(&self, venue: Venue, ticker: Ticker, markets: Vec<MarketKind>) -> Result<Box<dyn VenueAdapter>> {
        for factory in &self.factories {
            if factory.accept(venue) {
                return factory.build(ticker, markets).await;
            }
        }
        bail!("no adapter factory registered for venue {venue}")
    }
}

impl Default for CexFactories {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds and connects an on-chain polling adapter, sharing one
/// wrapped-native-price cache per chain across every pool monitored on
/// that chain (spec §4.2.2).
pub async fn build_onchain_adapter(
    ticker: Ticker,
    chain: Chain,
    pool_address: &str,
    caches: &DashMap<Chain, Arc<WrappedNativeCache>>,
) -> Result<Box<dyn VenueAdapter>> {
    let address = parse_pool_address(pool_address)?;
    let cache = caches.entry(chain).or_insert_with(|| Arc::new(WrappedNativeCache::new())).clone();
    let mut adapter = OnChainAdapter::new(ticker, chain, address, cache)?;
    adapter.connect(&[MarketKind::OnChainAmm]).await?;
    Ok(Box::new(adapter))
}
