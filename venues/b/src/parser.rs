use eyre::{eyre, Result};
use serde::Deserialize;

use monitor_codec::decode_first_deal;
use monitor_model::{MarketKind, PriceSample, Ticker, Time, Venue, VenueId};

/// Venue B's spot channel pushes the length-delimited binary wrapper
/// message (monitor-codec's subset of the wire format); the first deal's
/// price becomes the sample.
pub fn parse_binary_deal(ticker: &Ticker, payload: &[u8]) -> Option<PriceSample> {
    let deal = decode_first_deal(payload)?;
    let price: f64 = deal.price.parse().ok()?;
    Some(PriceSample {
        venue: VenueId::Cex(Venue::B),
        symbol: ticker.clone(),
        price,
        timestamp: Time::from_millis(deal.time),
        market: MarketKind::Spot,
        volume_24h: deal.quantity.parse().ok(),
    })
}

#[derive(Debug, Deserialize)]
struct DerivativeFrame {
    channel: Option<String>,
    data: Option<DerivativeTicker>,
}

#[derive(Debug, Deserialize)]
struct DerivativeTicker {
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    #[serde(rename = "volume24h")]
    volume_24h: Option<f64>,
}

/// Venue B's derivative channel is plain JSON: `{"channel":"...", "data":
/// {"lastPrice": ..., "volume24h": ...}}`. Anything not matching the ticker
/// channel shape decodes but yields no sample.
pub fn parse_derivative_json(ticker: &Ticker, text: &str) -> Result<Option<PriceSample>> {
    let frame: DerivativeFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(_) => return Ok(None),
    };
    if frame.channel.as_deref() != Some("contract.ticker") {
        return Ok(None);
    }
    let Some(data) = frame.data else { return Ok(None) };
    let Some(last_price) = data.last_price else { return Ok(None) };
    if !last_price.is_finite() {
        return Err(eyre!("venue B: non-finite derivative price"));
    }
    Ok(Some(PriceSample {
        venue: VenueId::Cex(Venue::B),
        symbol: ticker.clone(),
        price: last_price,
        timestamp: Time::now(),
        market: MarketKind::Derivative,
        volume_24h: data.volume_24h,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_ticker_channel_parses() {
        let ticker = Ticker::new("BTC");
        let text = r#"{"channel":"contract.ticker","data":{"lastPrice":67100.5,"volume24h":9000.0}}"#;
        let sample = parse_derivative_json(&ticker, text).unwrap().unwrap();
        assert_eq!(sample.price, 67100.5);
        assert_eq!(sample.market, MarketKind::Derivative);
    }

    #[test]
    fn unrelated_channel_yields_no_sample() {
        let ticker = Ticker::new("BTC");
        let text = r#"{"channel":"contract.depth","data":{}}"#;
        assert!(parse_derivative_json(&ticker, text).unwrap().is_none());
    }
}
