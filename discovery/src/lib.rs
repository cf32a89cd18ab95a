mod chains;

use futures::future::join_all;
use monitor_core::ListingProbe;
use monitor_model::{Chain, MarketKind, MonitoringSpec, Ticker, VenueMarkets};
use monitor_venue_a::VenueAListingProbe;
use monitor_venue_b::VenueBListingProbe;
use monitor_venue_c::VenueCListingProbe;
use monitor_venue_d::VenueDListingProbe;

pub use chains::check_chain_listed;

/// Fans a `checkListing` call out across every known CEX venue plus a
/// listing probe per supported chain, then assembles a `MonitoringSpec`
/// naming only venues that actually list the ticker on at least one market.
pub struct Discovery {
    probes: Vec<Box<dyn ListingProbe>>,
}

impl Discovery {
    pub fn new(client: reqwest::Client) -> Self {
        let probes: Vec<Box<dyn ListingProbe>> = vec![
            Box::new(VenueAListingProbe::new(client.clone())),
            Box::new(VenueBListingProbe::new(client.clone())),
            Box::new(VenueCListingProbe::new(client.clone())),
            Box::new(VenueDListingProbe::new(client)),
        ];
        Self { probes }
    }

    /// Runs discovery for one ticker at the given threshold. Returns a spec
    /// with an empty `venues` list when nothing is listed anywhere — callers
    /// (the connection manager's `StartMonitoringAuto`) treat that as a
    /// failure, discovery itself does not.
    pub async fn discover(&self, ticker: &Ticker, threshold_percent: f64) -> MonitoringSpec {
        let listing_futures = self.probes.iter().map(|probe| {
            let ticker = ticker.clone();
            async move { (probe.venue(), probe.check_listing(&ticker).await) }
        });
        let listings = join_all(listing_futures).await;

        let mut venues = Vec::new();
        let mut recommendations = Vec::new();
        for (venue, status) in listings {
            let mut markets = Vec::new();
            if status.spot {
                markets.push(MarketKind::Spot);
            }
            if status.futures {
                markets.push(MarketKind::Derivative);
            }
            if markets.is_empty() {
                continue;
            }
            recommendations.push(format!(
                "{venue}: listed as {} ({})",
                status.symbol,
                markets.iter().map(|m| m.to_string()).collect::<Vec<_>>().join("+")
            ));
            venues.push(VenueMarkets { venue, markets });
        }

        let mut onchain_pools = Vec::new();
        for chain in Chain::ALL {
            if check_chain_listed(chain, ticker).await {
                recommendations.push(format!("{chain}: on-chain pool available"));
            }
        }

        MonitoringSpec {
            ticker: ticker.clone(),
            venues,
            onchain_pools,
            threshold_percent,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn discover_never_panics_on_unreachable_venues() {
        let discovery = Discovery::new(reqwest::Client::new());
        let spec = discovery.discover(&Ticker::new("BTC"), 1.0).await;
        // Every listing probe hits a real (likely unreachable in test
        // sandboxes) host and degrades to "not listed" on failure; this
        // just asserts the call completes and returns a well-formed spec.
        assert_eq!(spec.ticker, Ticker::new("BTC"));
        assert!(spec.onchain_pools.is_empty());
    }
}
