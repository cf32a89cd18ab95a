use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The four centralized exchanges this system speaks to, named generically
/// rather than by brand: downstream code keys only on this identifier, not
/// on any venue-specific symbol shape.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Venue {
    A,
    B,
    C,
    D,
}

impl Venue {
    pub const ALL: [Venue; 4] = [Venue::A, Venue::B, Venue::C, Venue::D];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum MarketKind {
    Spot,
    Derivative,
    OnChainAmm,
}

/// On-chain networks with a Uniswap-V2-compatible factory this system reads
/// pool reserves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Chain {
    Ethereum,
    Bsc,
    Polygon,
    Arbitrum,
}

impl Chain {
    pub const ALL: [Chain; 4] = [Chain::Ethereum, Chain::Bsc, Chain::Polygon, Chain::Arbitrum];

    /// Env var overriding this chain's RPC URL.
    pub fn rpc_env_var(&self) -> &'static str {
        match self {
            Chain::Ethereum => "RPC_URL_ETHEREUM",
            Chain::Bsc => "RPC_URL_BSC",
            Chain::Polygon => "RPC_URL_POLYGON",
            Chain::Arbitrum => "RPC_URL_ARBITRUM",
        }
    }
}

/// A venue identity spanning both the streaming CEX family and the on-chain
/// AMM family, used as the key space in `SessionState`/adapter lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VenueId {
    Cex(Venue),
    OnChain(Chain),
}

impl std::fmt::Display for VenueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VenueId::Cex(v) => write!(f, "{v}"),
            VenueId::OnChain(c) => write!(f, "onchain:{c}"),
        }
    }
}
