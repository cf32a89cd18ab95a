use eyre::{eyre, Result};
use serde::Deserialize;

use monitor_model::{MarketKind, PriceSample, Ticker, Time, Venue, VenueId};

#[derive(Debug, Deserialize)]
struct TickerFrame {
    #[serde(rename = "e")]
    event: Option<String>,
    #[serde(rename = "c")]
    last_price: Option<String>,
    #[serde(rename = "v")]
    volume: Option<String>,
}

/// Venue A pushes one JSON object per update: a 24h-ticker-style payload
/// with the last trade price in field `c`. Anything else (subscription
/// acks, other event types) decodes but yields no sample.
pub fn parse_frame(ticker: &Ticker, market: MarketKind, text: &str) -> Result<Option<PriceSample>> {
    let frame: TickerFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(_) => return Ok(None),
    };
    if frame.event.as_deref() != Some("24hrTicker") {
        return Ok(None);
    }
    let Some(price_str) = frame.last_price else {
        return Ok(None);
    };
    let price: f64 = price_str.parse().map_err(|_| eyre!("venue A: unparsable price {price_str:?}"))?;
    Ok(Some(PriceSample {
        venue: VenueId::Cex(Venue::A),
        symbol: ticker.clone(),
        price,
        timestamp: Time::now(),
        market,
        volume_24h: frame.volume.and_then(|v| v.parse().ok()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ticker_event_into_sample() {
        let ticker = Ticker::new("BTC");
        let text = r#"{"e":"24hrTicker","s":"BTCUSDT","c":"67000.12","v":"1234.5"}"#;
        let sample = parse_frame(&ticker, MarketKind::Spot, text).unwrap().unwrap();
        assert_eq!(sample.price, 67000.12);
        assert_eq!(sample.volume_24h, Some(1234.5));
    }

    #[test]
    fn non_ticker_events_and_garbage_yield_no_sample() {
        let ticker = Ticker::new("BTC");
        assert!(parse_frame(&ticker, MarketKind::Spot, r#"{"e":"subscribed"}"#).unwrap().is_none());
        assert!(parse_frame(&ticker, MarketKind::Spot, "not json").unwrap().is_none());
    }
}
