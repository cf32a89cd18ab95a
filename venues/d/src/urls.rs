use monitor_model::{MarketKind, Ticker};

/// Venue D serves both spot and derivative from the same public websocket
/// endpoint; the derivative channel argument carries `instType=USDT-FUTURES`
/// to disambiguate instead of a separate host.
pub fn ws_url(_market: MarketKind) -> &'static str {
    "wss://ws.d/v2/ws/public"
}

pub fn rest_listing_url(ticker: &Ticker, market: MarketKind) -> String {
    match market {
        MarketKind::Spot => format!("https://api.d/api/v2/spot/ticker?symbol={}", spot_symbol(ticker)),
        MarketKind::Derivative => format!(
            "https://api.d/api/v2/mix/market/ticker?symbol={}&productType=USDT-FUTURES",
            derivative_symbol(ticker)
        ),
        MarketKind::OnChainAmm => unreachable!("venue D has no on-chain market"),
    }
}

pub fn spot_symbol(ticker: &Ticker) -> String {
    format!("{}USDT", ticker.as_str())
}

pub fn derivative_symbol(ticker: &Ticker) -> String {
    format!("{}USDT", ticker.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_markets_share_the_same_websocket_host() {
        assert_eq!(ws_url(MarketKind::Spot), ws_url(MarketKind::Derivative));
    }

    #[test]
    fn symbols_use_no_separator_on_either_market() {
        let ticker = Ticker::new("BTC");
        assert_eq!(spot_symbol(&ticker), "BTCUSDT");
        assert_eq!(derivative_symbol(&ticker), "BTCUSDT");
    }
}
