use std::collections::HashMap;

/// Identifies a cached subscribe frame: either scoped to one symbol (so it
/// can be looked up/replaced per market) or sent once regardless of symbol.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum SubscriptionId {
    Symbol(String),
    Global,
}

#[derive(Debug, Clone)]
struct Subscription {
    id: SubscriptionId,
    message: String,
}

/// Caches the subscribe frames sent on a websocket session so that a
/// reconnect can replay them in order, without the adapter re-deriving them.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    subscriptions: HashMap<SubscriptionId, Vec<Subscription>>,
    cached_messages: Vec<Subscription>,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_subscription_symbol(&mut self, symbol: impl Into<String>, message: String) {
        let symbol = symbol.into();
        let subscription = Subscription {
            id: SubscriptionId::Symbol(symbol.clone()),
            message,
        };
        self.subscriptions
            .entry(SubscriptionId::Symbol(symbol))
            .or_default()
            .push(subscription.clone());
        self.cached_messages.push(subscription);
    }

    pub fn register_subscription_global(&mut self, message: String) {
        let subscription = Subscription {
            id: SubscriptionId::Global,
            message,
        };
        self.subscriptions
            .entry(SubscriptionId::Global)
            .or_default()
            .push(subscription.clone());
        self.cached_messages.push(subscription);
    }

    pub fn get_messages(&self) -> Vec<String> {
        self.cached_messages.iter().map(|s| s.message.clone()).collect()
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
        self.cached_messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_messages_in_registration_order() {
        let mut subs = SubscriptionManager::new();
        subs.register_subscription_global("a".into());
        subs.register_subscription_symbol("BTC", "b".into());
        subs.register_subscription_symbol("ETH", "c".into());
        assert_eq!(subs.get_messages(), vec!["a", "b", "c"]);
    }
}
