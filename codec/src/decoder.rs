use crate::reader::ByteReader;

const WIRE_VARINT: u64 = 0;
const WIRE_FIXED64: u64 = 1;
const WIRE_LENGTH_DELIMITED: u64 = 2;
const WIRE_FIXED32: u64 = 5;

const FIELD_CHANNEL: u64 = 1;
const FIELD_SYMBOL: u64 = 3;
const FIELD_CREATE_TIME: u64 = 5;
const FIELD_SEND_TIME: u64 = 6;
const FIELD_PUBLIC_AGGRE_DEALS: u64 = 314;
// Spec §4.3 describes field 314 as a wrapper *containing* a repeated deal
// sub-message but leaves the inner field number unspecified. Field 1 is the
// conventional slot for a wrapper's sole repeated payload in this family of
// messages, so that's what's decoded here.
const FIELD_DEALS_LIST: u64 = 1;

const FIELD_DEAL_PRICE: u64 = 1;
const FIELD_DEAL_QUANTITY: u64 = 2;
const FIELD_DEAL_TYPE: u64 = 3;
const FIELD_DEAL_TIME: u64 = 4;

/// One trade print inside a venue's aggregated-deals push. `trade_type` is
/// carried through unmapped — the venues interpret it themselves.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Deal {
    pub price: String,
    pub quantity: String,
    pub trade_type: i32,
    pub time: i64,
}

/// The outer push-channel envelope. Only the fields this monitor reads are
/// modeled; everything else is skipped by wire type and discarded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WrapperMessage {
    pub channel: Option<String>,
    pub symbol: Option<String>,
    pub create_time: Option<i64>,
    pub send_time: Option<i64>,
    pub deals: Vec<Deal>,
}

fn read_tag(r: &mut ByteReader) -> Option<(u64, u64)> {
    let tag = r.read_varint()?;
    Some((tag >> 3, tag & 0x7))
}

/// Consumes one field's value per its wire type, discarding the result.
/// Used for both genuinely-unknown field numbers and fields whose wire type
/// doesn't match what this decoder expects for that field number.
fn skip_field(r: &mut ByteReader, wire_type: u64) -> Option<()> {
    match wire_type {
        WIRE_VARINT => {
            r.read_varint()?;
        }
        WIRE_FIXED64 => {
            r.read_fixed64()?;
        }
        WIRE_LENGTH_DELIMITED => {
            r.read_length_delimited()?;
        }
        WIRE_FIXED32 => {
            r.read_fixed32()?;
        }
        _ => return None,
    }
    Some(())
}

/// Decodes field 314's payload: a wrapper carrying a repeated deal
/// sub-message (see `FIELD_DEALS_LIST`), not a bare deal. Unknown fields
/// inside the wrapper are skipped the same as at the top level.
fn decode_deals_batch(buf: &[u8]) -> Option<Vec<Deal>> {
    let mut r = ByteReader::new(buf);
    let mut deals = Vec::new();
    while !r.is_empty() {
        let (field, wire_type) = read_tag(&mut r)?;
        match (field, wire_type) {
            (FIELD_DEALS_LIST, WIRE_LENGTH_DELIMITED) => {
                let payload = r.read_length_delimited()?;
                deals.push(decode_deal(payload)?);
            }
            (_, wire_type) => skip_field(&mut r, wire_type)?,
        }
    }
    Some(deals)
}

fn decode_deal(buf: &[u8]) -> Option<Deal> {
    let mut r = ByteReader::new(buf);
    let mut deal = Deal::default();
    while !r.is_empty() {
        let (field, wire_type) = read_tag(&mut r)?;
        match (field, wire_type) {
            (FIELD_DEAL_PRICE, WIRE_LENGTH_DELIMITED) => deal.price = r.read_string()?,
            (FIELD_DEAL_QUANTITY, WIRE_LENGTH_DELIMITED) => deal.quantity = r.read_string()?,
            (FIELD_DEAL_TYPE, WIRE_VARINT) => deal.trade_type = r.read_varint()? as i32,
            (FIELD_DEAL_TIME, WIRE_VARINT) => deal.time = r.read_varint()? as i64,
            (_, wire_type) => skip_field(&mut r, wire_type)?,
        }
    }
    Some(deal)
}

/// Parses the protobuf-subset wire format described for venue pushes:
/// varint, fixed64, length-delimited and fixed32 wire types, with unknown
/// fields skipped by length rather than rejected. Returns `None` only when
/// the buffer is truncated or a tag uses a wire type this decoder has no
/// handler for at all (group start/end, reserved type 3/4).
pub fn decode_wrapper(buf: &[u8]) -> Option<WrapperMessage> {
    let mut r = ByteReader::new(buf);
    let mut msg = WrapperMessage::default();
    while !r.is_empty() {
        let (field, wire_type) = read_tag(&mut r)?;
        match (field, wire_type) {
            (FIELD_CHANNEL, WIRE_LENGTH_DELIMITED) => msg.channel = Some(r.read_string()?),
            (FIELD_SYMBOL, WIRE_LENGTH_DELIMITED) => msg.symbol = Some(r.read_string()?),
            (FIELD_CREATE_TIME, WIRE_VARINT) => msg.create_time = Some(r.read_varint()? as i64),
            (FIELD_SEND_TIME, WIRE_VARINT) => msg.send_time = Some(r.read_varint()? as i64),
            (FIELD_PUBLIC_AGGRE_DEALS, WIRE_LENGTH_DELIMITED) => {
                let payload = r.read_length_delimited()?;
                msg.deals.extend(decode_deals_batch(payload)?);
            }
            (_, wire_type) => skip_field(&mut r, wire_type)?,
        }
    }
    Some(msg)
}

/// The decoder contract the venue adapters actually need: the first deal's
/// `{price, quantity, time}`, or `None` if the push carried no deals or the
/// payload was malformed.
pub fn decode_first_deal(buf: &[u8]) -> Option<Deal> {
    decode_wrapper(buf).and_then(|msg| msg.deals.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_tag(out: &mut Vec<u8>, field: u64, wire_type: u64) {
        push_varint(out, (field << 3) | wire_type);
    }

    fn push_varint(out: &mut Vec<u8>, mut value: u64) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                out.push(byte);
                break;
            } else {
                out.push(byte | 0x80);
            }
        }
    }

    fn push_string(out: &mut Vec<u8>, field: u64, value: &str) {
        push_tag(out, field, WIRE_LENGTH_DELIMITED);
        push_varint(out, value.len() as u64);
        out.extend_from_slice(value.as_bytes());
    }

    fn push_varint_field(out: &mut Vec<u8>, field: u64, value: i64) {
        push_tag(out, field, WIRE_VARINT);
        push_varint(out, value as u64);
    }

    fn encode_deal(deal: &Deal) -> Vec<u8> {
        let mut out = Vec::new();
        push_string(&mut out, FIELD_DEAL_PRICE, &deal.price);
        push_string(&mut out, FIELD_DEAL_QUANTITY, &deal.quantity);
        push_varint_field(&mut out, FIELD_DEAL_TYPE, deal.trade_type as i64);
        push_varint_field(&mut out, FIELD_DEAL_TIME, deal.time);
        out
    }

    /// Wraps one deal in the `FIELD_DEALS_LIST`-keyed batch and pushes it as
    /// field 314, matching the nested shape `decode_deals_batch` expects.
    fn push_deal(out: &mut Vec<u8>, deal: &Deal) {
        push_deals(out, std::slice::from_ref(deal));
    }

    fn push_deals(out: &mut Vec<u8>, deals: &[Deal]) {
        let mut batch = Vec::new();
        for deal in deals {
            let encoded = encode_deal(deal);
            push_tag(&mut batch, FIELD_DEALS_LIST, WIRE_LENGTH_DELIMITED);
            push_varint(&mut batch, encoded.len() as u64);
            batch.extend_from_slice(&encoded);
        }
        push_tag(out, FIELD_PUBLIC_AGGRE_DEALS, WIRE_LENGTH_DELIMITED);
        push_varint(out, batch.len() as u64);
        out.extend_from_slice(&batch);
    }

    #[test]
    fn decodes_channel_symbol_and_single_deal() {
        let mut buf = Vec::new();
        push_string(&mut buf, FIELD_CHANNEL, "push.deal");
        push_string(&mut buf, FIELD_SYMBOL, "BTC_USDT");
        push_varint_field(&mut buf, FIELD_CREATE_TIME, 1_700_000_000_000);
        push_varint_field(&mut buf, FIELD_SEND_TIME, 1_700_000_000_050);
        let deal = Deal {
            price: "0.5".to_string(),
            quantity: "10".to_string(),
            trade_type: 1,
            time: 1_700_000_000_000,
        };
        push_deal(&mut buf, &deal);

        let decoded = decode_wrapper(&buf).expect("well formed buffer decodes");
        assert_eq!(decoded.channel.as_deref(), Some("push.deal"));
        assert_eq!(decoded.symbol.as_deref(), Some("BTC_USDT"));
        assert_eq!(decoded.create_time, Some(1_700_000_000_000));
        assert_eq!(decoded.deals, vec![deal.clone()]);

        let first = decode_first_deal(&buf).expect("first deal present");
        assert_eq!(first, deal);
    }

    #[test]
    fn decodes_multiple_deals_from_one_nested_batch() {
        let mut buf = Vec::new();
        push_string(&mut buf, FIELD_SYMBOL, "BTC_USDT");
        let deals = vec![
            Deal {
                price: "0.5".to_string(),
                quantity: "10".to_string(),
                trade_type: 1,
                time: 1_700_000_000_000,
            },
            Deal {
                price: "0.51".to_string(),
                quantity: "4".to_string(),
                trade_type: 2,
                time: 1_700_000_000_010,
            },
        ];
        push_deals(&mut buf, &deals);

        let decoded = decode_wrapper(&buf).expect("nested batch decodes");
        assert_eq!(decoded.deals, deals);
        assert_eq!(decode_first_deal(&buf), Some(deals[0].clone()));
    }

    #[test]
    fn unknown_fields_are_skipped_without_disturbing_known_ones() {
        let mut buf = Vec::new();
        push_string(&mut buf, 99, "some-unknown-string-field");
        push_varint_field(&mut buf, 100, 42);
        push_string(&mut buf, FIELD_SYMBOL, "ETH_USDT");
        let deal = Deal {
            price: "1800.25".to_string(),
            quantity: "2".to_string(),
            trade_type: 2,
            time: 1_700_000_001_000,
        };
        push_deal(&mut buf, &deal);
        push_varint_field(&mut buf, 200, -1);

        let decoded = decode_wrapper(&buf).expect("trailing unknown fields still decode");
        assert_eq!(decoded.symbol.as_deref(), Some("ETH_USDT"));
        assert_eq!(decoded.deals, vec![deal]);
    }

    #[test]
    fn no_deals_present_yields_none_first_deal() {
        let mut buf = Vec::new();
        push_string(&mut buf, FIELD_SYMBOL, "NO_DEALS");
        assert_eq!(decode_first_deal(&buf), None);
    }

    #[test]
    fn truncated_buffer_returns_none_rather_than_panicking() {
        let mut buf = Vec::new();
        push_tag(&mut buf, FIELD_SYMBOL, WIRE_LENGTH_DELIMITED);
        push_varint(&mut buf, 50);
        buf.extend_from_slice(b"short");
        assert_eq!(decode_wrapper(&buf), None);
    }

    #[test]
    fn negative_int64_round_trips_through_two_s_complement_varint() {
        let mut buf = Vec::new();
        let deal = Deal {
            price: "1".to_string(),
            quantity: "1".to_string(),
            trade_type: 0,
            time: -1_700_000_000_000,
        };
        push_deal(&mut buf, &deal);
        let decoded = decode_first_deal(&buf).unwrap();
        assert_eq!(decoded.time, -1_700_000_000_000);
    }
}
