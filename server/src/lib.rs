mod dto;
mod error;
mod handlers;

pub use handlers::AppState;

use axum::routing::{get, post};
use axum::Router;

/// The six-endpoint JSON REST surface from spec §6, plus a `/healthz`
/// liveness probe. Tickers are upper-cased before use inside the handlers;
/// unknown request fields are ignored by `serde`'s default behavior.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/monitoring/start", post(handlers::start_monitoring))
        .route("/api/monitoring/stop", post(handlers::stop_monitoring))
        .route("/api/monitoring/status", get(handlers::get_status))
        .route("/api/token/discover", post(handlers::discover_token))
        .route("/api/token/config", post(handlers::token_config))
        .route("/api/exchanges/supported", get(handlers::exchanges_supported))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
