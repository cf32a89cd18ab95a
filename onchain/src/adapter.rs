use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ethers::providers::{Http, Provider};
use ethers::types::Address;
use eyre::{bail, eyre, Result};
use monitor_core::{AdapterEvent, VenueAdapter};
use monitor_model::{Chain, MarketKind, PriceSample, SessionState, SessionStatus, Ticker, Time, VenueId};
use tracing::warn;

use crate::abi::IUniswapV2Pair;
use crate::cache::WrappedNativeCache;
use crate::chain_config::ChainConfig;
use crate::price::{adjust_reserve, spot_price};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(300);
const SLOW_POLL_THRESHOLD: Duration = Duration::from_secs(1);

/// Periodically reads one Uniswap-V2-compatible pool's reserves and turns
/// them into a `PriceSample`, implementing the same `VenueAdapter` contract
/// the streaming venue adapters do. `connect` resolves token0/token1/decimals
/// once; `next` sleeps for the poll interval, reads reserves, and on RPC
/// failure logs, bumps `rpc_failures`, and tries again on the next tick
/// rather than returning an error.
pub struct OnChainAdapter {
    ticker: Ticker,
    chain: Chain,
    pool_address: Address,
    poll_interval: Duration,
    provider: Arc<Provider<Http>>,
    config: ChainConfig,
    wrapped_native_cache: Arc<WrappedNativeCache>,
    target_token: Option<Address>,
    quote_kind: Option<QuoteKind>,
    target_decimals: Option<u8>,
    quote_decimals: Option<u8>,
    rpc_failures: u64,
    connected: bool,
}

#[derive(Debug, Clone, Copy)]
enum QuoteKind {
    Stable,
    WrappedNative,
}

impl OnChainAdapter {
    pub fn new(ticker: Ticker, chain: Chain, pool_address: Address, wrapped_native_cache: Arc<WrappedNativeCache>) -> Result<Self> {
        let config = ChainConfig::for_chain(chain);
        let provider = Provider::<Http>::try_from(config.rpc_url())?;
        Ok(Self {
            ticker,
            chain,
            pool_address,
            poll_interval: DEFAULT_POLL_INTERVAL,
            provider: Arc::new(provider),
            config,
            wrapped_native_cache,
            target_token: None,
            quote_kind: None,
            target_decimals: None,
            quote_decimals: None,
            rpc_failures: 0,
            connected: false,
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn rpc_failures(&self) -> u64 {
        self.rpc_failures
    }

    fn venue_id(&self) -> VenueId {
        VenueId::OnChain(self.chain)
    }

    async fn resolve_tokens(&mut self) -> Result<()> {
        let pair = IUniswapV2Pair::new(self.pool_address, self.provider.clone());
        let token0 = pair.token_0().call().await?;
        let token1 = pair.token_1().call().await?;

        let (target, quote, quote_kind) = if self.config.is_stable(token1) {
            (token0, token1, QuoteKind::Stable)
        } else if self.config.is_stable(token0) {
            (token1, token0, QuoteKind::Stable)
        } else if self.config.is_wrapped_native(token1) {
            (token0, token1, QuoteKind::WrappedNative)
        } else if self.config.is_wrapped_native(token0) {
            (token1, token0, QuoteKind::WrappedNative)
        } else {
            bail!("pool {:?} on {} is neither target/stable nor target/wrapped-native", self.pool_address, self.chain);
        };

        let target_decimals = fetch_decimals(&self.provider, target).await?;
        let quote_decimals = fetch_decimals(&self.provider, quote).await?;

        self.target_token = Some(target);
        self.quote_kind = Some(quote_kind);
        self.target_decimals = Some(target_decimals);
        self.quote_decimals = Some(quote_decimals);
        Ok(())
    }

    async fn read_price(&mut self) -> Result<f64> {
        let pair = IUniswapV2Pair::new(self.pool_address, self.provider.clone());
        let (reserve0, reserve1, _) = pair.get_reserves().call().await?;
        let token0 = pair.token_0().call().await?;

        let target = self.target_token.ok_or_else(|| eyre!("tokens not yet resolved"))?;
        let target_decimals = self.target_decimals.unwrap();
        let quote_decimals = self.quote_decimals.unwrap();

        let (target_raw, quote_raw) = if token0 == target {
            (reserve0, reserve1)
        } else {
            (reserve1, reserve0)
        };

        let target_reserve = adjust_reserve(target_raw.into(), target_decimals);
        let quote_reserve = adjust_reserve(quote_raw.into(), quote_decimals);
        let base_price = spot_price(target_reserve, quote_reserve).ok_or_else(|| eyre!("empty pool reserves"))?;

        match self.quote_kind {
            Some(QuoteKind::Stable) => Ok(base_price),
            Some(QuoteKind::WrappedNative) => {
                let native_price = self.wrapped_native_cache.price(&self.provider, &self.config).await?;
                Ok(base_price * native_price)
            }
            None => Err(eyre!("tokens not yet resolved")),
        }
    }
}

async fn fetch_decimals(provider: &Arc<Provider<Http>>, token: Address) -> Result<u8> {
    let erc20 = crate::abi::IErc20Metadata::new(token, provider.clone());
    Ok(erc20.decimals().call().await?)
}

#[async_trait]
impl VenueAdapter for OnChainAdapter {
    async fn connect(&mut self, markets: &[MarketKind]) -> Result<()> {
        if !markets.contains(&MarketKind::OnChainAmm) {
            bail!("on-chain adapter only serves MarketKind::OnChainAmm");
        }
        self.resolve_tokens().await?;
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self, _markets: &[MarketKind]) {
        self.connected = false;
    }

    async fn reconnect(&mut self, markets: &[MarketKind]) -> Result<()> {
        self.connect(markets).await
    }

    fn is_connected(&self, market: MarketKind) -> bool {
        self.connected && market == MarketKind::OnChainAmm
    }

    async fn next(&mut self) -> Result<AdapterEvent> {
        if !self.connected {
            return Ok(AdapterEvent::Status(SessionState {
                ticker: self.ticker.clone(),
                venue: self.venue_id(),
                market: MarketKind::OnChainAmm,
                status: SessionStatus::Disconnected,
                last_update: None,
                error_message: None,
                reconnect_attempt: 0,
            }));
        }

        loop {
            tokio::time::sleep(self.poll_interval).await;

            let started = Instant::now();
            let result = self.read_price().await;
            let elapsed = started.elapsed();
            if elapsed > SLOW_POLL_THRESHOLD {
                warn!(ticker = %self.ticker, chain = %self.chain, ?elapsed, "on-chain poll took longer than 1s");
            }

            match result {
                Ok(price) => {
                    return Ok(AdapterEvent::Sample(PriceSample {
                        venue: self.venue_id(),
                        symbol: self.ticker.clone(),
                        price,
                        timestamp: Time::now(),
                        market: MarketKind::OnChainAmm,
                        volume_24h: None,
                    }));
                }
                Err(e) => {
                    self.rpc_failures += 1;
                    warn!(ticker = %self.ticker, chain = %self.chain, %e, failures = self.rpc_failures, "on-chain poll failed, skipping sample");
                    continue;
                }
            }
        }
    }
}
