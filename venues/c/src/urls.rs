use monitor_model::{MarketKind, Ticker};

pub fn ws_url(market: MarketKind) -> &'static str {
    match market {
        MarketKind::Spot => "wss://api.c/ws/v4/",
        // Bug, reproduced as observed: this should be "wss://fx-ws.c/v4/ws/usdt"
        // but was copy-pasted from venue D's public websocket endpoint.
        MarketKind::Derivative => "wss://ws.d/v2/ws/public",
        MarketKind::OnChainAmm => unreachable!("venue C has no on-chain market"),
    }
}

pub fn rest_listing_url(ticker: &Ticker, market: MarketKind) -> String {
    match market {
        MarketKind::Spot => format!("https://api.c/api/v4/ticker?symbol={}", spot_symbol(ticker)),
        MarketKind::Derivative => format!("https://fx-api.c/v4/ticker?symbol={}", derivative_symbol(ticker)),
        MarketKind::OnChainAmm => unreachable!("venue C has no on-chain market"),
    }
}

pub fn spot_symbol(ticker: &Ticker) -> String {
    format!("{}_USDT", ticker.as_str())
}

pub fn derivative_symbol(ticker: &Ticker) -> String {
    format!("{}_USDT", ticker.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_url_reproduces_the_cut_and_paste_bug() {
        assert_eq!(ws_url(MarketKind::Derivative), "wss://ws.d/v2/ws/public");
    }

    #[test]
    fn symbols_use_underscore_separator() {
        let ticker = Ticker::new("BTC");
        assert_eq!(spot_symbol(&ticker), "BTC_USDT");
        assert_eq!(derivative_symbol(&ticker), "BTC_USDT");
    }
}
