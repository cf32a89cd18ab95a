use serde::{Deserialize, Serialize};

use crate::{MarketKind, Ticker, Time, VenueId};

/// A single normalized price observation from one venue. Ephemeral: only the
/// latest sample per (ticker, venue) is ever retained by the price store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub venue: VenueId,
    pub symbol: Ticker,
    pub price: f64,
    pub timestamp: Time,
    pub market: MarketKind,
    pub volume_24h: Option<f64>,
}

impl PriceSample {
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(price: f64) -> PriceSample {
        PriceSample {
            venue: VenueId::Cex(crate::Venue::A),
            symbol: Ticker::new("BTC"),
            price,
            timestamp: Time::now(),
            market: MarketKind::Spot,
            volume_24h: None,
        }
    }

    #[test]
    fn rejects_non_finite_and_negative() {
        assert!(sample(100.0).is_valid());
        assert!(!sample(-1.0).is_valid());
        assert!(!sample(f64::NAN).is_valid());
        assert!(!sample(f64::INFINITY).is_valid());
    }
}
