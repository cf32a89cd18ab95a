use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use common::LogLevel;
use eyre::Result;
use monitor_discovery::Discovery;
use monitor_manager::ConnectionManager;
use monitor_server::build_router;
use monitor_store::PriceStore;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct CliArgs {
    /// Address the HTTP API listens on.
    #[clap(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind_addr: String,
    #[clap(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = common::dotenv();
    let args = CliArgs::parse();
    let log_level = LogLevel::from_str(&args.log_level)?;
    common::setup_logs(log_level)?;

    let store = Arc::new(PriceStore::new());
    let discovery = Discovery::new(reqwest::Client::new());
    let manager = Arc::new(ConnectionManager::new(store, discovery));

    let addr: SocketAddr = args.bind_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "monitor listening");

    let app = build_router(manager.clone());

    tokio::select! {
        res = axum::serve(listener, app) => {
            if let Err(e) = res {
                error!(%e, "server terminated with error");
            }
        }
        _ = wait_for_shutdown() => {
            info!("shutdown signal received, disconnecting every monitored ticker");
        }
    }

    manager.emergency_disconnect_all().await;
    Ok(())
}

async fn wait_for_shutdown() {
    let mut sigterm = signal(SignalKind::terminate()).expect("failed installing SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed installing SIGINT handler");
    tokio::select! {
        _ = sigterm.recv() => {},
        _ = sigint.recv() => {},
    }
}
