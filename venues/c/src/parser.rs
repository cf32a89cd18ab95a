use serde::Deserialize;

use monitor_model::{MarketKind, PriceSample, Ticker, Time, Venue, VenueId};

#[derive(Debug, Deserialize)]
struct Frame {
    event: Option<String>,
    channel: Option<String>,
    data: Option<FrameData>,
}

#[derive(Debug, Deserialize)]
struct FrameData {
    price: Option<f64>,
    volume: Option<f64>,
}

/// Venue C wraps updates in a time/channel/event envelope; only
/// `event == "update"` on the market-ticker channel carries a sample.
pub fn parse_frame(ticker: &Ticker, market: MarketKind, text: &str) -> Option<PriceSample> {
    let frame: Frame = serde_json::from_str(text).ok()?;
    if frame.event.as_deref() != Some("update") {
        return None;
    }
    if frame.channel.as_deref() != Some("market.ticker") {
        return None;
    }
    let data = frame.data?;
    let price = data.price?;
    if !price.is_finite() {
        return None;
    }
    Some(PriceSample {
        venue: VenueId::Cex(Venue::C),
        symbol: ticker.clone(),
        price,
        timestamp: Time::now(),
        market,
        volume_24h: data.volume,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_event_on_ticker_channel_parses() {
        let ticker = Ticker::new("BTC");
        let text = r#"{"time":1700000000000,"channel":"market.ticker","event":"update","data":{"price":67200.0,"volume":500.0}}"#;
        let sample = parse_frame(&ticker, MarketKind::Spot, text).unwrap();
        assert_eq!(sample.price, 67200.0);
    }

    #[test]
    fn subscribe_ack_event_yields_no_sample() {
        let ticker = Ticker::new("BTC");
        let text = r#"{"time":1700000000000,"channel":"market.ticker","event":"subscribed"}"#;
        assert!(parse_frame(&ticker, MarketKind::Spot, text).is_none());
    }
}
