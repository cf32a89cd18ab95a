use monitor_model::{MarketKind, Ticker};

/// Venue A carries its entire subscription in the URL path — no subscribe
/// frame is ever sent.
pub fn ws_url(ticker: &Ticker, market: MarketKind) -> String {
    let sym = ticker.as_str().to_ascii_lowercase();
    match market {
        MarketKind::Spot => format!("wss://stream.a/ws/{sym}usdt@ticker"),
        MarketKind::Derivative => format!("wss://fstream.a/ws/{sym}usdt@ticker"),
        MarketKind::OnChainAmm => unreachable!("venue A has no on-chain market"),
    }
}

pub fn rest_listing_url(ticker: &Ticker, market: MarketKind) -> String {
    let symbol = spot_symbol(ticker);
    match market {
        MarketKind::Spot => format!("https://api.a/api/v3/ticker/price?symbol={symbol}"),
        MarketKind::Derivative => format!("https://fapi.a/fapi/v1/ticker/price?symbol={symbol}"),
        MarketKind::OnChainAmm => unreachable!("venue A has no on-chain market"),
    }
}

pub fn spot_symbol(ticker: &Ticker) -> String {
    format!("{}USDT", ticker.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_lowercase_path_with_uppercase_symbol_elsewhere() {
        let ticker = Ticker::new("btc");
        assert_eq!(ws_url(&ticker, MarketKind::Spot), "wss://stream.a/ws/btcusdt@ticker");
        assert_eq!(ws_url(&ticker, MarketKind::Derivative), "wss://fstream.a/ws/btcusdt@ticker");
        assert_eq!(spot_symbol(&ticker), "BTCUSDT");
    }
}
