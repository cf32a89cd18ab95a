use serde::{Deserialize, Serialize};

use monitor_manager::HealthCheck;
use monitor_model::MonitoringSpec;

fn default_threshold() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartMonitoringRequest {
    pub ticker: String,
    #[serde(default = "default_threshold")]
    pub threshold_percent: f64,
    #[serde(default = "default_true")]
    pub use_auto_config: bool,
    #[serde(default)]
    pub custom_config: Option<MonitoringSpec>,
}

#[derive(Debug, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct StopMonitoringRequest {
    pub ticker: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub ticker: Option<String>,
}

/// `ticker` is populated when the request names one; otherwise `tickers`
/// carries every actively monitored ticker's connections/prices/opportunities.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub health: HealthCheck,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<monitor_manager::TickerMonitoringInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickers: Option<Vec<monitor_manager::TickerMonitoringInfo>>,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverRequest {
    pub ticker: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfigRequest {
    pub ticker: String,
    #[serde(default = "default_threshold")]
    pub threshold_percent: f64,
}

#[derive(Debug, Serialize)]
pub struct ExchangesResponse {
    pub exchanges: Vec<String>,
    pub total: usize,
}
