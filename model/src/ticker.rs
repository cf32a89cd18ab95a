use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Canonical uppercase base-asset symbol, e.g. `BTC`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Ticker {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Ticker {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_case_and_whitespace() {
        assert_eq!(Ticker::new(" btc "), Ticker::new("BTC"));
        assert_eq!(Ticker::new("eth").as_str(), "ETH");
    }
}
