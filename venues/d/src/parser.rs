use eyre::{eyre, Result};
use serde::Deserialize;

use monitor_model::{MarketKind, PriceSample, Ticker, Time, Venue, VenueId};

#[derive(Debug, Deserialize)]
struct Frame {
    arg: Option<FrameArg>,
    data: Option<Vec<FrameData>>,
}

#[derive(Debug, Deserialize)]
struct FrameArg {
    channel: Option<String>,
    #[serde(rename = "instType")]
    inst_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FrameData {
    #[serde(rename = "lastPr")]
    last_price: Option<String>,
    #[serde(rename = "baseVolume")]
    base_volume: Option<String>,
    ts: Option<String>,
}

/// Both of venue D's markets push the same ticker-channel JSON envelope;
/// the derivative arg additionally carries `instType=USDT-FUTURES`.
pub fn parse_frame(ticker: &Ticker, market: MarketKind, text: &str) -> Result<Option<PriceSample>> {
    let frame: Frame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(_) => return Ok(None),
    };
    let Some(arg) = frame.arg else { return Ok(None) };
    if arg.channel.as_deref() != Some("ticker") {
        return Ok(None);
    }
    if market == MarketKind::Derivative && arg.inst_type.as_deref() != Some("USDT-FUTURES") {
        return Ok(None);
    }
    let Some(entry) = frame.data.and_then(|mut d| d.pop()) else {
        return Ok(None);
    };
    let Some(price_str) = entry.last_price else {
        return Ok(None);
    };
    let price: f64 = price_str.parse().map_err(|_| eyre!("venue D: unparseable last price"))?;
    if !price.is_finite() {
        return Err(eyre!("venue D: non-finite price"));
    }
    let timestamp = entry
        .ts
        .and_then(|ts| ts.parse::<i64>().ok())
        .map(Time::from_millis)
        .unwrap_or_else(Time::now);
    Ok(Some(PriceSample {
        venue: VenueId::Cex(Venue::D),
        symbol: ticker.clone(),
        price,
        timestamp,
        market,
        volume_24h: entry.base_volume.and_then(|v| v.parse().ok()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_ticker_channel_parses() {
        let ticker = Ticker::new("BTC");
        let text = r#"{"arg":{"channel":"ticker","instType":"SPOT"},"data":[{"lastPr":"67000.5","baseVolume":"1200.0","ts":"1700000000000"}]}"#;
        let sample = parse_frame(&ticker, MarketKind::Spot, text).unwrap().unwrap();
        assert_eq!(sample.price, 67000.5);
    }

    #[test]
    fn derivative_requires_matching_inst_type() {
        let ticker = Ticker::new("BTC");
        let text = r#"{"arg":{"channel":"ticker","instType":"SPOT"},"data":[{"lastPr":"67000.5"}]}"#;
        assert!(parse_frame(&ticker, MarketKind::Derivative, text).unwrap().is_none());
    }

    #[test]
    fn non_ticker_channel_yields_no_sample() {
        let ticker = Ticker::new("BTC");
        let text = r#"{"arg":{"channel":"trade"},"data":[{"lastPr":"1.0"}]}"#;
        assert!(parse_frame(&ticker, MarketKind::Spot, text).unwrap().is_none());
    }
}
