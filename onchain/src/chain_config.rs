use ethers::types::Address;
use monitor_model::Chain;

fn addr(literal: &str) -> Address {
    literal.parse().expect("hardcoded chain address literal must be valid")
}

/// Per-chain addresses and defaults needed to price a target/stable (or
/// target/wrapped-native) Uniswap-V2-compatible pool.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub chain: Chain,
    pub default_rpc_url: &'static str,
    pub wrapped_native: Address,
    pub usdt: Address,
    pub usdc: Address,
    pub factory: Address,
    pub wrapped_native_stable_pool: Address,
}

impl ChainConfig {
    pub fn for_chain(chain: Chain) -> Self {
        match chain {
            Chain::Ethereum => ChainConfig {
                chain,
                default_rpc_url: "https://eth.llamarpc.com",
                wrapped_native: addr("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
                usdt: addr("0xdAC17F958D2ee523a2206206994597C13D831ec7"),
                usdc: addr("0xA0b86991c6218b36c1D19D4a2e9Eb0cE3606eB48"),
                factory: addr("0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f"),
                wrapped_native_stable_pool: addr("0x0d4a11d5EEaaC28EC3F61d100daF4d40471f1852"),
            },
            Chain::Bsc => ChainConfig {
                chain,
                default_rpc_url: "https://bsc-dataseed.binance.org",
                wrapped_native: addr("0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"),
                usdt: addr("0x55d398326f99059fF775485246999027B3197955"),
                usdc: addr("0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d"),
                factory: addr("0xcA143Ce32Fe78f1f7019d7d551a6402fC5350c73"),
                wrapped_native_stable_pool: addr("0x16b9a82891338f9bA80E2D6970FddA79D1eb0daE"),
            },
            Chain::Polygon => ChainConfig {
                chain,
                default_rpc_url: "https://polygon-rpc.com",
                wrapped_native: addr("0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"),
                usdt: addr("0xc2132D05D31c914a87C6611C10748AEb04B58e8F"),
                usdc: addr("0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359"),
                factory: addr("0x5757371414417b8C6CAad45bAeF941aBc7d3Ab32"),
                wrapped_native_stable_pool: addr("0x604229c960e5CACF2aaEAc8Be68Ac07BA9dF81c3"),
            },
            Chain::Arbitrum => ChainConfig {
                chain,
                default_rpc_url: "https://arb1.arbitrum.io/rpc",
                wrapped_native: addr("0x82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
                usdt: addr("0xFd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9"),
                usdc: addr("0xaf88d065e77c8cC2239327C5EDb3A432268e5831"),
                factory: addr("0xc35DADB65012eC5796536bD9864eD8773aBc74C4"),
                wrapped_native_stable_pool: addr("0xCB0E5bFa72bBb4d16AB5aA0c60601c438F04b4ad"),
            },
        }
    }

    /// The RPC URL, overridable per chain through the environment.
    pub fn rpc_url(&self) -> String {
        std::env::var(self.chain.rpc_env_var()).unwrap_or_else(|_| self.default_rpc_url.to_string())
    }

    pub fn is_stable(&self, token: Address) -> bool {
        token == self.usdt || token == self.usdc
    }

    pub fn is_wrapped_native(&self, token: Address) -> bool {
        token == self.wrapped_native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_chain_resolves_distinct_addresses() {
        for chain in Chain::ALL {
            let config = ChainConfig::for_chain(chain);
            assert_ne!(config.wrapped_native, config.usdt);
            assert_ne!(config.usdt, config.usdc);
        }
    }
}
