use chrono::{DateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Debug, Display, Formatter};
use std::ops::Sub;
use std::time::SystemTime;

pub type TimeStampMs = i64;

/// Wall-clock instant, millisecond resolution. Mirrors the exchange/on-chain
/// timestamps this system ingests; nanosecond precision is not needed here.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Time {
    millis: TimeStampMs,
}

impl Time {
    pub const NULL: Self = Self { millis: 0 };

    pub const fn from_millis(millis: TimeStampMs) -> Self {
        Self { millis }
    }

    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_millis() as TimeStampMs;
        Self { millis }
    }

    pub const fn millis(&self) -> TimeStampMs {
        self.millis
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.millis).single().unwrap_or_default()
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_utc().to_rfc3339())
    }
}

impl Debug for Time {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.millis)
    }
}

impl From<TimeStampMs> for Time {
    fn from(millis: TimeStampMs) -> Self {
        Self { millis }
    }
}

impl Sub<Time> for Time {
    type Output = TimeStampMs;
    fn sub(self, rhs: Time) -> Self::Output {
        self.millis - rhs.millis
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.millis)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MillisVisitor;
        impl<'de> de::Visitor<'de> for MillisVisitor {
            type Value = Time;
            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("a millisecond timestamp")
            }
            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Time { millis: v })
            }
            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                self.visit_i64(v as i64)
            }
        }
        deserializer.deserialize_i64(MillisVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json_as_a_plain_integer() {
        let t = Time::from_millis(1_700_000_000_123);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "1700000000123");
        let back: Time = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
