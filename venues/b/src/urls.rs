use monitor_model::{MarketKind, Ticker};

/// Venue B needs an explicit subscribe frame on both markets.
pub fn ws_url(market: MarketKind) -> &'static str {
    match market {
        MarketKind::Spot => "wss://wbs-api.b/ws",
        MarketKind::Derivative => "wss://contract.b/edge",
        MarketKind::OnChainAmm => unreachable!("venue B has no on-chain market"),
    }
}

pub fn rest_listing_url(ticker: &Ticker, market: MarketKind) -> String {
    match market {
        MarketKind::Spot => format!("https://api.b/api/v3/ticker/price?symbol={}", spot_symbol(ticker)),
        MarketKind::Derivative => format!("https://contract-api.b/api/v1/contracts/{}", derivative_symbol(ticker)),
        MarketKind::OnChainAmm => unreachable!("venue B has no on-chain market"),
    }
}

pub fn spot_symbol(ticker: &Ticker) -> String {
    format!("{}USDT", ticker.as_str())
}

pub fn derivative_symbol(ticker: &Ticker) -> String {
    format!("{}_USDT", ticker.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_and_derivative_symbols_use_different_separators() {
        let ticker = Ticker::new("eth");
        assert_eq!(spot_symbol(&ticker), "ETHUSDT");
        assert_eq!(derivative_symbol(&ticker), "ETH_USDT");
    }
}
