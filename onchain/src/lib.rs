mod abi;
mod adapter;
mod cache;
mod chain_config;
mod price;

pub use adapter::{OnChainAdapter, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
pub use cache::WrappedNativeCache;
pub use chain_config::ChainConfig;

use ethers::types::Address;
use eyre::{Context, Result};

/// Parses a pool-pair contract address. Addresses are accepted
/// case-insensitively; `ethers` normalizes to its checksummed `Debug`/
/// `Display` form internally so callers never need to compare raw strings.
pub fn parse_pool_address(raw: &str) -> Result<Address> {
    raw.parse::<Address>().context("invalid pool contract address")
}
