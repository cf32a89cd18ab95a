mod spread;

pub use spread::{compute_opportunities, round_spread};

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use monitor_core::{CallbackRegistry, SubscriptionHandle};
use monitor_model::{ArbitrageOpportunity, MarketKind, PriceSample, Ticker, Time, VenueId};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Threshold a ticker is monitored at until `set_threshold` overrides it.
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 0.5;

/// Minimum change in the top-ranked spread, in percentage points, that
/// forces a subscriber notification even when the opportunity set's
/// cardinality hasn't changed.
const TOP_SPREAD_NOTIFY_DELTA: f64 = 0.1;

type SampleKey = (VenueId, MarketKind);

struct TickerInner {
    samples: HashMap<SampleKey, PriceSample>,
    threshold_percent: f64,
    opportunities: Vec<ArbitrageOpportunity>,
    validation_errors: u64,
    last_notified_cardinality: usize,
    last_notified_top_spread: Option<f64>,
}

impl TickerInner {
    fn new() -> Self {
        Self {
            samples: HashMap::new(),
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
            opportunities: Vec::new(),
            validation_errors: 0,
            last_notified_cardinality: 0,
            last_notified_top_spread: None,
        }
    }
}

struct TickerEntry {
    inner: Mutex<TickerInner>,
    registry: CallbackRegistry<Vec<ArbitrageOpportunity>>,
}

impl TickerEntry {
    fn new() -> Self {
        Self {
            inner: Mutex::new(TickerInner::new()),
            registry: CallbackRegistry::new(),
        }
    }
}

/// The in-memory price store: one writer lock per ticker, arbitrage
/// recomputed on every accepted update, subscribers notified only when the
/// visible opportunity set actually moved. A `DashMap`-of-per-key-state
/// layout with per-key locking so recomputation and notification never
/// block an unrelated ticker.
#[derive(Default)]
pub struct PriceStore {
    tickers: DashMap<Ticker, Arc<TickerEntry>>,
}

impl PriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, ticker: &Ticker) -> Arc<TickerEntry> {
        self.tickers
            .entry(ticker.clone())
            .or_insert_with(|| Arc::new(TickerEntry::new()))
            .clone()
    }

    pub fn set_threshold(&self, ticker: &Ticker, threshold_percent: f64) {
        let entry = self.entry(ticker);
        entry.inner.lock().threshold_percent = threshold_percent;
    }

    /// Applies one venue's price observation. Samples failing
    /// `PriceSample::is_valid` (negative, NaN, infinite) are rejected and
    /// counted rather than propagated as an error — a single bad tick from
    /// one venue must not interrupt monitoring of the rest.
    pub fn update_price(&self, sample: PriceSample) {
        if !sample.is_valid() {
            let entry = self.entry(&sample.symbol);
            entry.inner.lock().validation_errors += 1;
            warn!(ticker = %sample.symbol, venue = %sample.venue, price = sample.price, "rejected invalid price sample");
            return;
        }

        let entry = self.entry(&sample.symbol);
        let notify_payload = {
            let mut inner = entry.inner.lock();
            inner.samples.insert((sample.venue, sample.market), sample.clone());
            let mut samples: Vec<_> = inner.samples.values().cloned().collect();
            samples.sort_by_key(|s| (s.venue, s.market));
            let opportunities = compute_opportunities(&samples, inner.threshold_percent, Time::now());

            let cardinality = opportunities.len();
            let top_spread = opportunities.first().map(|o| o.spread_percent);
            let cardinality_changed = cardinality != inner.last_notified_cardinality;
            let top_spread_changed = match (top_spread, inner.last_notified_top_spread) {
                (Some(new), Some(old)) => (new - old).abs() >= TOP_SPREAD_NOTIFY_DELTA,
                (Some(_), None) | (None, Some(_)) => true,
                (None, None) => false,
            };

            inner.opportunities = opportunities.clone();

            if cardinality_changed || top_spread_changed {
                inner.last_notified_cardinality = cardinality;
                inner.last_notified_top_spread = top_spread;
                Some(opportunities)
            } else {
                None
            }
        };

        // Callbacks run after the lock is released — never while holding
        // it, since a subscriber may call back into the store.
        if let Some(opportunities) = notify_payload {
            debug!(ticker = %sample.symbol, count = opportunities.len(), "notifying arbitrage subscribers");
            entry.registry.notify_all(opportunities);
        }
    }

    pub fn subscribe(&self, ticker: &Ticker, callback: impl Fn(Vec<ArbitrageOpportunity>) + Send + Sync + 'static) -> SubscriptionHandle {
        self.entry(ticker).registry.subscribe(callback)
    }

    pub fn unsubscribe(&self, ticker: &Ticker, handle: SubscriptionHandle) {
        if let Some(entry) = self.tickers.get(ticker) {
            entry.registry.unsubscribe(handle);
        }
    }

    pub fn get_prices(&self, ticker: &Ticker) -> Vec<PriceSample> {
        self.tickers
            .get(ticker)
            .map(|entry| entry.inner.lock().samples.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_opportunities(&self, ticker: &Ticker) -> Vec<ArbitrageOpportunity> {
        self.tickers
            .get(ticker)
            .map(|entry| entry.inner.lock().opportunities.clone())
            .unwrap_or_default()
    }

    pub fn validation_error_count(&self, ticker: &Ticker) -> u64 {
        self.tickers.get(ticker).map(|entry| entry.inner.lock().validation_errors).unwrap_or(0)
    }

    /// Drops all samples and cached opportunities for a ticker, e.g. when
    /// monitoring stops — subscribers stay registered.
    pub fn clear_ticker(&self, ticker: &Ticker) {
        if let Some(entry) = self.tickers.get(ticker) {
            let mut inner = entry.inner.lock();
            inner.samples.clear();
            inner.opportunities.clear();
            inner.last_notified_cardinality = 0;
            inner.last_notified_top_spread = None;
        }
    }

    pub fn tickers(&self) -> Vec<Ticker> {
        self.tickers.iter().map(|e| e.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_model::Venue;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample(venue: Venue, market: MarketKind, price: f64) -> PriceSample {
        PriceSample {
            venue: VenueId::Cex(venue),
            symbol: Ticker::new("BTC"),
            price,
            timestamp: Time::now(),
            market,
            volume_24h: None,
        }
    }

    #[test]
    fn invalid_samples_are_counted_not_applied() {
        let store = PriceStore::new();
        let ticker = Ticker::new("BTC");
        store.update_price(sample(Venue::A, MarketKind::Spot, -1.0));
        assert_eq!(store.validation_error_count(&ticker), 1);
        assert!(store.get_prices(&ticker).is_empty());
    }

    #[test]
    fn cardinality_change_triggers_notification() {
        let store = PriceStore::new();
        let ticker = Ticker::new("BTC");
        store.set_threshold(&ticker, 1.0);
        let notifications = Arc::new(AtomicUsize::new(0));
        let notifications2 = notifications.clone();
        store.subscribe(&ticker, move |_| {
            notifications2.fetch_add(1, Ordering::SeqCst);
        });

        store.update_price(sample(Venue::A, MarketKind::Spot, 100.0));
        assert_eq!(notifications.load(Ordering::SeqCst), 0);

        store.update_price(sample(Venue::B, MarketKind::Spot, 103.0));
        assert_eq!(notifications.load(Ordering::SeqCst), 1);

        // Re-sending the same B price produces the same opportunity set —
        // no new notification.
        store.update_price(sample(Venue::B, MarketKind::Spot, 103.0));
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn small_top_spread_move_is_suppressed_but_large_move_notifies() {
        let store = PriceStore::new();
        let ticker = Ticker::new("BTC");
        store.set_threshold(&ticker, 1.0);
        let notifications = Arc::new(AtomicUsize::new(0));
        let notifications2 = notifications.clone();
        store.subscribe(&ticker, move |_| {
            notifications2.fetch_add(1, Ordering::SeqCst);
        });

        store.update_price(sample(Venue::A, MarketKind::Spot, 100.0));
        store.update_price(sample(Venue::B, MarketKind::Spot, 103.0));
        assert_eq!(notifications.load(Ordering::SeqCst), 1);

        // Spread moves from 3.0pp to 3.09pp — under the 0.1pp bar.
        store.update_price(sample(Venue::B, MarketKind::Spot, 103.09));
        assert_eq!(notifications.load(Ordering::SeqCst), 1);

        // Spread moves to 3.2pp — clears the bar.
        store.update_price(sample(Venue::B, MarketKind::Spot, 103.2));
        assert_eq!(notifications.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn ranking_is_deterministic_through_the_store_path() {
        // Spec §8 scenario 2: A=10, B=10.3, C=10.6, threshold 1% — A→B and
        // B→C tie at 0.30 absolute profit, and the venue with the lower
        // ordinal key must rank first regardless of update arrival order.
        let store = PriceStore::new();
        let ticker = Ticker::new("BTC");
        store.set_threshold(&ticker, 1.0);
        store.update_price(sample(Venue::C, MarketKind::Spot, 10.6));
        store.update_price(sample(Venue::A, MarketKind::Spot, 10.0));
        store.update_price(sample(Venue::B, MarketKind::Spot, 10.3));

        let ops = store.get_opportunities(&ticker);
        assert_eq!(ops.len(), 3);
        assert_eq!((ops[0].buy.venue, ops[0].sell.venue), (VenueId::Cex(Venue::A), VenueId::Cex(Venue::C)));
        assert_eq!((ops[1].buy.venue, ops[1].sell.venue), (VenueId::Cex(Venue::A), VenueId::Cex(Venue::B)));
        assert_eq!((ops[2].buy.venue, ops[2].sell.venue), (VenueId::Cex(Venue::B), VenueId::Cex(Venue::C)));
    }

    #[test]
    fn clear_ticker_drops_samples_but_keeps_subscribers() {
        let store = PriceStore::new();
        let ticker = Ticker::new("BTC");
        store.update_price(sample(Venue::A, MarketKind::Spot, 100.0));
        store.clear_ticker(&ticker);
        assert!(store.get_prices(&ticker).is_empty());
        assert!(store.get_opportunities(&ticker).is_empty());
    }
}
