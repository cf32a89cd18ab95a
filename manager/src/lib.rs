mod factories;
mod status;
mod task;

pub use status::{HealthCheck, MonitoringInfo, TickerMonitoringInfo};

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use eyre::{eyre, Result};
use futures::future::join_all;
use monitor_core::{CallbackRegistry, SubscriptionHandle};
use monitor_discovery::Discovery;
use monitor_model::{Chain, MarketKind, MonitoringSpec, SessionState, SessionStatus, Ticker, Venue, VenueId};
use monitor_onchain::WrappedNativeCache;
use monitor_store::PriceStore;
use tracing::warn;

use crate::factories::{build_onchain_adapter, CexFactories};
use crate::task::{Command, TaskHandle};

/// Every market kind a `Disconnect` might cover; harmless to pass markets
/// an adapter never opened — it simply finds no matching session to close.
const ALL_MARKETS: [MarketKind; 3] = [MarketKind::Spot, MarketKind::Derivative, MarketKind::OnChainAmm];

/// Cancellation budget for `StopMonitoring`/`EmergencyDisconnectAll`: one
/// full poll interval plus slack for an in-flight RPC or websocket call to
/// wind down (spec §5).
const STOP_TIMEOUT: Duration = Duration::from_millis(1_500);

type TaskKey = (Ticker, VenueId);

/// Owns the active adapter set for every monitored ticker; the only
/// component allowed to create, reconnect, or tear down an adapter. Wraps
/// `PriceStore` and `Discovery` rather than owning their lifecycle — both
/// are injected so tests can construct an isolated manager (spec §9).
pub struct ConnectionManager {
    store: Arc<PriceStore>,
    discovery: Discovery,
    cex_factories: CexFactories,
    wrapped_native_caches: DashMap<Chain, Arc<WrappedNativeCache>>,
    tasks: DashMap<TaskKey, TaskHandle>,
    sessions: Arc<DashMap<String, SessionState>>,
    status_registry: Arc<CallbackRegistry<SessionState>>,
    start_failures: DashMap<String, String>,
}

impl ConnectionManager {
    pub fn new(store: Arc<PriceStore>, discovery: Discovery) -> Self {
        Self {
            store,
            discovery,
            cex_factories: CexFactories::new(),
            wrapped_native_caches: DashMap::new(),
            tasks: DashMap::new(),
            sessions: Arc::new(DashMap::new()),
            status_registry: Arc::new(CallbackRegistry::new()),
            start_failures: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<PriceStore> {
        &self.store
    }

    /// Runs discovery for `ticker` without starting anything — backs the
    /// HTTP `/api/token/discover` and `/api/token/config` endpoints.
    pub async fn discover(&self, ticker: &Ticker, threshold_percent: f64) -> MonitoringSpec {
        self.discovery.discover(ticker, threshold_percent).await
    }

    /// Runs discovery for `ticker` and starts monitoring whatever it finds.
    /// Fails without starting anything if discovery lists the ticker
    /// nowhere.
    pub async fn start_monitoring_auto(&self, ticker: &Ticker, threshold_percent: f64) -> Result<MonitoringSpec> {
        let spec = self.discovery.discover(ticker, threshold_percent).await;
        if spec.venues.is_empty() && spec.onchain_pools.is_empty() {
            return Err(eyre!("no venues found listing {ticker}"));
        }
        self.start_monitoring(spec.clone()).await;
        Ok(spec)
    }

    /// Starts, or extends, monitoring for every venue/market/pool named in
    /// `spec`. All starts run in parallel; an individual failure lands in
    /// `start_failures` rather than aborting the rest (spec §4.5).
    pub async fn start_monitoring(&self, spec: MonitoringSpec) {
        self.store.set_threshold(&spec.ticker, spec.threshold_percent);

        let mut futs: Vec<Pin<Box<dyn Future<Output = ()> + Send + '_>>> = Vec::new();
        for vm in &spec.venues {
            futs.push(Box::pin(self.start_cex(spec.ticker.clone(), vm.venue, vm.markets.clone())));
        }
        for pool in &spec.onchain_pools {
            futs.push(Box::pin(self.start_onchain(spec.ticker.clone(), pool.chain, pool.pool_address.clone())));
        }
        join_all(futs).await;
    }

    async fn start_cex(&self, ticker: Ticker, venue: Venue, markets: Vec<MarketKind>) {
        let key = (ticker.clone(), VenueId::Cex(venue));

        let existing = self.tasks.get(&key).map(|handle| handle.commands.clone());
        if let Some(sender) = existing {
            let (ack_tx, ack_rx) = tokio::sync::oneshot::channel();
            if sender.send(Command::Connect(markets, ack_tx)).is_err() {
                self.tasks.remove(&key);
            } else {
                match ack_rx.await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => self.record_failure(&ticker, VenueId::Cex(venue), e.to_string()),
                    Err(_) => self.record_failure(&ticker, VenueId::Cex(venue), "adapter task gone".into()),
                }
            }
            return;
        }

        match self.cex_factories.build(venue, ticker.clone(), markets.clone()).await {
            Ok(adapter) => {
                let handle = task::spawn(
                    ticker.clone(),
                    VenueId::Cex(venue),
                    adapter,
                    markets,
                    self.store.clone(),
                    self.sessions.clone(),
                    self.status_registry.clone(),
                );
                self.tasks.insert(key, handle);
            }
            Err(e) => self.record_failure(&ticker, VenueId::Cex(venue), e.to_string()),
        }
    }

    /// One adapter per (ticker, chain): the on-chain adapter has no
    /// "extend markets" operation, so a second pool requested for a chain
    /// already being monitored for this ticker is a no-op.
    async fn start_onchain(&self, ticker: Ticker, chain: Chain, pool_address: String) {
        let key = (ticker.clone(), VenueId::OnChain(chain));
        if self.tasks.contains_key(&key) {
            return;
        }

        match build_onchain_adapter(ticker.clone(), chain, &pool_address, &self.wrapped_native_caches).await {
            Ok(adapter) => {
                let handle = task::spawn(
                    ticker.clone(),
                    VenueId::OnChain(chain),
                    adapter,
                    vec![MarketKind::OnChainAmm],
                    self.store.clone(),
                    self.sessions.clone(),
                    self.status_registry.clone(),
                );
                self.tasks.insert(key, handle);
            }
            Err(e) => self.record_failure(&ticker, VenueId::OnChain(chain), e.to_string()),
        }
    }

    fn record_failure(&self, ticker: &Ticker, venue: VenueId, message: String) {
        warn!(%ticker, %venue, %message, "adapter start failed");
        self.start_failures.insert(format!("{ticker}|{venue}"), message);
    }

    pub fn start_failure(&self, ticker: &Ticker, venue: VenueId) -> Option<String> {
        self.start_failures.get(&format!("{ticker}|{venue}")).map(|e| e.clone())
    }

    /// Stops every adapter for `ticker`: each task is told to disconnect
    /// every market it might hold, which empties its active set and ends
    /// its task. Waits up to `STOP_TIMEOUT` per task, then clears session
    /// state and the price store regardless of whether the wait timed out.
    pub async fn stop_monitoring(&self, ticker: &Ticker) {
        let keys: Vec<TaskKey> = self.tasks.iter().filter(|e| &e.key().0 == ticker).map(|e| e.key().clone()).collect();

        let mut joins = Vec::new();
        for key in &keys {
            if let Some((_, handle)) = self.tasks.remove(key) {
                let _ = handle.commands.send(Command::Disconnect(ALL_MARKETS.to_vec()));
                joins.push(handle.join);
            }
        }
        for join in joins {
            if tokio::time::timeout(STOP_TIMEOUT, join).await.is_err() {
                warn!(%ticker, "adapter task did not shut down within the cancellation budget");
            }
        }

        let prefix = format!("{ticker}|");
        self.sessions.retain(|k, _| !k.starts_with(&prefix));
        self.start_failures.retain(|k, _| !k.starts_with(&prefix));
        self.store.clear_ticker(ticker);
    }

    /// Forces an explicit reconnect of one (ticker, venue, market) session,
    /// resetting its backoff attempt counter. Errors if no adapter is
    /// currently active for that (ticker, venue) pair.
    pub fn reconnect_exchange(&self, ticker: &Ticker, venue: VenueId, market: MarketKind) -> Result<()> {
        let key = (ticker.clone(), venue);
        let sender = self
            .tasks
            .get(&key)
            .map(|handle| handle.commands.clone())
            .ok_or_else(|| eyre!("no active adapter for {ticker}|{venue}"))?;
        sender.send(Command::Reconnect(vec![market])).map_err(|_| eyre!("adapter task gone"))?;
        Ok(())
    }

    pub fn get_connection_status(&self, ticker: Option<&Ticker>) -> Vec<SessionState> {
        match ticker {
            Some(t) => {
                let prefix = format!("{t}|");
                self.sessions.iter().filter(|e| e.key().starts_with(&prefix)).map(|e| e.value().clone()).collect()
            }
            None => self.sessions.iter().map(|e| e.value().clone()).collect(),
        }
    }

    pub fn health_check(&self) -> HealthCheck {
        let mut hc = HealthCheck::default();
        for entry in self.sessions.iter() {
            hc.total_sessions += 1;
            match entry.value().status {
                SessionStatus::Connected => hc.connected += 1,
                SessionStatus::Connecting => hc.connecting += 1,
                SessionStatus::Disconnected => hc.disconnected += 1,
                SessionStatus::Error => hc.error += 1,
            }
        }
        hc.healthy = hc.total_sessions == 0 || hc.connected > 0;
        hc
    }

    pub fn get_monitoring_info(&self) -> MonitoringInfo {
        let tickers: BTreeSet<Ticker> = self.sessions.iter().map(|e| e.value().ticker.clone()).collect();
        let tickers = tickers
            .into_iter()
            .map(|ticker| {
                let sessions = self.get_connection_status(Some(&ticker));
                let prices = self.store.get_prices(&ticker);
                let opportunities = self.store.get_opportunities(&ticker);
                TickerMonitoringInfo {
                    ticker,
                    sessions,
                    prices,
                    opportunities,
                }
            })
            .collect();
        MonitoringInfo { tickers }
    }

    pub fn on_status_update(&self, callback: impl Fn(SessionState) + Send + Sync + 'static) -> SubscriptionHandle {
        self.status_registry.subscribe(callback)
    }

    pub fn remove_status_update(&self, handle: SubscriptionHandle) {
        self.status_registry.unsubscribe(handle);
    }

    /// `StopMonitoring` for every ticker with an active adapter. Idempotent:
    /// calling it with nothing active is a no-op.
    pub async fn emergency_disconnect_all(&self) {
        let tickers: BTreeSet<Ticker> = self.tasks.iter().map(|e| e.key().0.clone()).collect();
        for ticker in tickers {
            self.stop_monitoring(&ticker).await;
        }
    }
}
