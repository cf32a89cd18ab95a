use monitor_model::{ArbitrageOpportunity, PriceSample, Time};

/// Rounds a spread percentage to two decimal places (0.01 percentage point)
/// using half-away-from-zero rounding (see `DESIGN.md` for the rationale).
pub fn round_spread(value: f64) -> f64 {
    let scaled = value * 100.0;
    let rounded = if scaled >= 0.0 {
        (scaled + 0.5).floor()
    } else {
        (scaled - 0.5).ceil()
    };
    rounded / 100.0
}

/// Computes every cross-venue pair within one ticker's live samples whose
/// spread clears `threshold_percent`, ranked by descending absolute profit.
/// Each unordered pair of samples is considered exactly once; `buy` is
/// always the cheaper side.
pub fn compute_opportunities(samples: &[PriceSample], threshold_percent: f64, now: Time) -> Vec<ArbitrageOpportunity> {
    let mut opportunities = Vec::new();
    for i in 0..samples.len() {
        for j in (i + 1)..samples.len() {
            let a = &samples[i];
            let b = &samples[j];
            let (buy, sell) = if a.price <= b.price { (a, b) } else { (b, a) };
            if buy.price <= 0.0 {
                continue;
            }
            let spread_percent = round_spread(100.0 * (sell.price - buy.price) / buy.price);
            if spread_percent < threshold_percent {
                continue;
            }
            opportunities.push(ArbitrageOpportunity {
                buy: buy.clone(),
                sell: sell.clone(),
                spread_percent,
                profit_abs: sell.price - buy.price,
                timestamp: now,
            });
        }
    }
    opportunities.sort_by(|a, b| b.profit_abs.abs().partial_cmp(&a.profit_abs.abs()).unwrap());
    opportunities
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_model::{MarketKind, Ticker, Venue, VenueId};

    fn sample(venue: Venue, price: f64) -> PriceSample {
        PriceSample {
            venue: VenueId::Cex(venue),
            symbol: Ticker::new("BTC"),
            price,
            timestamp: Time::now(),
            market: MarketKind::Spot,
            volume_24h: None,
        }
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_spread(1.005), 1.01);
        assert_eq!(round_spread(1.004), 1.0);
        assert_eq!(round_spread(-1.005), -1.01);
    }

    #[test]
    fn filters_below_threshold_and_ranks_by_profit() {
        let samples = vec![sample(Venue::A, 100.0), sample(Venue::B, 101.5), sample(Venue::C, 103.0)];
        let ops = compute_opportunities(&samples, 1.0, Time::now());
        assert_eq!(ops.len(), 3);
        assert!(ops[0].profit_abs.abs() >= ops[1].profit_abs.abs());
        assert!(ops[1].profit_abs.abs() >= ops[2].profit_abs.abs());
        assert_eq!(ops[0].buy.venue, VenueId::Cex(Venue::A));
        assert_eq!(ops[0].sell.venue, VenueId::Cex(Venue::C));
    }

    #[test]
    fn no_pair_clears_threshold_yields_empty() {
        let samples = vec![sample(Venue::A, 100.0), sample(Venue::B, 100.05)];
        let ops = compute_opportunities(&samples, 1.0, Time::now());
        assert!(ops.is_empty());
    }
}
