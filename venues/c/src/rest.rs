use std::time::Duration;

use async_trait::async_trait;
use monitor_core::ListingProbe;
use monitor_model::{MarketKind, Ticker, Venue};

use crate::urls::{rest_listing_url, spot_symbol};

const REST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct VenueCListingProbe {
    client: reqwest::Client,
}

impl VenueCListingProbe {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn probe(&self, url: &str) -> bool {
        match self.client.get(url).timeout(REST_TIMEOUT).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl ListingProbe for VenueCListingProbe {
    fn venue(&self) -> Venue {
        Venue::C
    }

    async fn check_listing(&self, ticker: &Ticker) -> monitor_core::ListingStatus {
        let spot = self.probe(&rest_listing_url(ticker, MarketKind::Spot)).await;
        let futures = self.probe(&rest_listing_url(ticker, MarketKind::Derivative)).await;
        monitor_core::ListingStatus {
            spot,
            futures,
            symbol: spot_symbol(ticker),
        }
    }
}
