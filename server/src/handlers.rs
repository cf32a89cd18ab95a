use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;

use monitor_manager::{ConnectionManager, TickerMonitoringInfo};
use monitor_model::{Ticker, Venue};

use crate::dto::*;
use crate::error::ApiError;

const DEFAULT_THRESHOLD_PERCENT: f64 = 1.0;

pub type AppState = Arc<ConnectionManager>;

fn require_ticker(raw: &str) -> Result<Ticker, ApiError> {
    if raw.trim().is_empty() {
        return Err(ApiError::bad_request("ticker is required"));
    }
    Ok(Ticker::new(raw))
}

fn ticker_info(manager: &ConnectionManager, ticker: &Ticker) -> TickerMonitoringInfo {
    TickerMonitoringInfo {
        ticker: ticker.clone(),
        sessions: manager.get_connection_status(Some(ticker)),
        prices: manager.store().get_prices(ticker),
        opportunities: manager.store().get_opportunities(ticker),
    }
}

/// `POST /api/monitoring/start`
pub async fn start_monitoring(
    State(manager): State<AppState>,
    Json(req): Json<StartMonitoringRequest>,
) -> Result<Json<SimpleResponse>, ApiError> {
    let ticker = require_ticker(&req.ticker)?;

    if req.use_auto_config {
        manager
            .start_monitoring_auto(&ticker, req.threshold_percent)
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?;
    } else {
        let mut spec = req
            .custom_config
            .ok_or_else(|| ApiError::bad_request("either useAutoConfig or customConfig must be provided"))?;
        spec.ticker = ticker.clone();
        manager.start_monitoring(spec).await;
    }

    Ok(Json(SimpleResponse {
        success: true,
        message: format!("monitoring started for {ticker}"),
    }))
}

/// `POST /api/monitoring/stop`
pub async fn stop_monitoring(
    State(manager): State<AppState>,
    Json(req): Json<StopMonitoringRequest>,
) -> Result<Json<SimpleResponse>, ApiError> {
    let ticker = require_ticker(&req.ticker)?;
    manager.stop_monitoring(&ticker).await;
    Ok(Json(SimpleResponse {
        success: true,
        message: format!("monitoring stopped for {ticker}"),
    }))
}

/// `GET /api/monitoring/status`
pub async fn get_status(
    State(manager): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let health = manager.health_check();

    let response = match query.ticker {
        Some(raw) if !raw.trim().is_empty() => {
            let ticker = Ticker::new(&raw);
            StatusResponse {
                health,
                ticker: Some(ticker_info(&manager, &ticker)),
                tickers: None,
            }
        }
        _ => {
            let info = manager.get_monitoring_info();
            StatusResponse {
                health,
                ticker: None,
                tickers: Some(info.tickers),
            }
        }
    };

    Ok(Json(response))
}

/// `POST /api/token/discover`
pub async fn discover_token(
    State(manager): State<AppState>,
    Json(req): Json<DiscoverRequest>,
) -> Result<Json<monitor_model::MonitoringSpec>, ApiError> {
    let ticker = require_ticker(&req.ticker)?;
    let spec = manager.discover(&ticker, DEFAULT_THRESHOLD_PERCENT).await;
    Ok(Json(spec))
}

/// `POST /api/token/config`
pub async fn token_config(
    State(manager): State<AppState>,
    Json(req): Json<TokenConfigRequest>,
) -> Result<Json<monitor_model::MonitoringSpec>, ApiError> {
    let ticker = require_ticker(&req.ticker)?;
    let spec = manager.discover(&ticker, req.threshold_percent).await;
    Ok(Json(spec))
}

/// `GET /api/exchanges/supported`
pub async fn exchanges_supported() -> Json<ExchangesResponse> {
    let exchanges: Vec<String> = Venue::ALL.iter().map(|v| v.to_string()).collect();
    let total = exchanges.len();
    Json(ExchangesResponse { exchanges, total })
}

/// `GET /healthz` — liveness only, independent of any monitored ticker.
pub async fn healthz() -> &'static str {
    "ok"
}
