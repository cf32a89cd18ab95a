use std::sync::Arc;
use std::time::{Duration, Instant};

use ethers::providers::{Http, Middleware, Provider};
use eyre::{eyre, Result};
use parking_lot::Mutex;

use crate::abi::IUniswapV2Pair;
use crate::chain_config::ChainConfig;
use crate::price::{adjust_reserve, spot_price};

const WRAPPED_NATIVE_CACHE_TTL: Duration = Duration::from_secs(3);

struct CachedPrice {
    price: f64,
    fetched_at: Instant,
}

/// Caches one chain's wrapped-native/stable price for `WRAPPED_NATIVE_CACHE_TTL`;
/// concurrent pollers within the TTL window share the cached value instead of
/// each issuing their own RPC round trip.
#[derive(Default)]
pub struct WrappedNativeCache {
    cached: Mutex<Option<CachedPrice>>,
}

impl WrappedNativeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn price(&self, provider: &Arc<Provider<Http>>, config: &ChainConfig) -> Result<f64> {
        if let Some(cached) = self.cached.lock().as_ref() {
            if cached.fetched_at.elapsed() < WRAPPED_NATIVE_CACHE_TTL {
                return Ok(cached.price);
            }
        }

        let price = self.fetch(provider, config).await?;
        *self.cached.lock() = Some(CachedPrice {
            price,
            fetched_at: Instant::now(),
        });
        Ok(price)
    }

    async fn fetch(&self, provider: &Arc<Provider<Http>>, config: &ChainConfig) -> Result<f64> {
        let pair = IUniswapV2Pair::new(config.wrapped_native_stable_pool, provider.clone());
        let (reserve0, reserve1, _) = pair.get_reserves().call().await?;
        let token0 = pair.token_0().call().await?;

        let (native_reserve, stable_reserve) = if token0 == config.wrapped_native {
            (reserve0, reserve1)
        } else {
            (reserve1, reserve0)
        };

        // Both legs of this pool are well-known addresses with fixed decimals
        // (18 for wrapped native, 6 for USDT/USDC on every supported chain).
        let native_adjusted = adjust_reserve(native_reserve.into(), 18);
        let stable_adjusted = adjust_reserve(stable_reserve.into(), 6);
        spot_price(native_adjusted, stable_adjusted).ok_or_else(|| eyre!("wrapped-native pool has no reserves"))
    }
}
