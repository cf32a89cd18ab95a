use serde::Serialize;

use monitor_model::{ArbitrageOpportunity, PriceSample, SessionState, Ticker};

/// Aggregate health across every session this manager is tracking.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthCheck {
    pub total_sessions: usize,
    pub connected: usize,
    pub connecting: usize,
    pub disconnected: usize,
    pub error: usize,
    /// `true` when there are no sessions at all (nothing to be unhealthy
    /// about) or at least one session is connected.
    pub healthy: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TickerMonitoringInfo {
    pub ticker: Ticker,
    pub sessions: Vec<SessionState>,
    pub prices: Vec<PriceSample>,
    pub opportunities: Vec<ArbitrageOpportunity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitoringInfo {
    pub tickers: Vec<TickerMonitoringInfo>,
}
