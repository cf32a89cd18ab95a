use monitor_model::{Chain, Ticker};

/// Listing probe for on-chain pools. The current implementation always
/// returns `false` — there is no generic way to ask a Uniswap-V2-compatible
/// factory "is there a reasonable pool for this ticker" without already
/// knowing a candidate pool address, so discovery never auto-activates
/// on-chain monitoring. Carried forward as-is (spec §9 open item); callers
/// that want on-chain coverage must supply pool addresses via a custom
/// `MonitoringSpec`.
pub async fn check_chain_listed(_chain: Chain, _ticker: &Ticker) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_reports_unlisted() {
        for chain in Chain::ALL {
            assert!(!check_chain_listed(chain, &Ticker::new("BTC")).await);
        }
    }
}
