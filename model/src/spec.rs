use serde::{Deserialize, Serialize};

use crate::{Chain, MarketKind, Ticker, Venue};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueMarkets {
    pub venue: Venue,
    pub markets: Vec<MarketKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnChainPool {
    pub chain: Chain,
    /// Pool-pair contract address (checksummed form, case-insensitive input).
    pub pool_address: String,
}

/// Resolved plan for one monitoring session, produced by discovery or a
/// caller-supplied custom config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSpec {
    pub ticker: Ticker,
    pub venues: Vec<VenueMarkets>,
    #[serde(default)]
    pub onchain_pools: Vec<OnChainPool>,
    pub threshold_percent: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
}
