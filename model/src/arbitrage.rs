use serde::{Deserialize, Serialize};

use crate::{PriceSample, Time};

/// A detected cross-venue spread. `buy.price <= sell.price` and
/// `spread_percent >= threshold[ticker]` are maintained as invariants by
/// whoever constructs these (the price store's arbitrage pass).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    pub buy: PriceSample,
    pub sell: PriceSample,
    pub spread_percent: f64,
    pub profit_abs: f64,
    pub timestamp: Time,
}
