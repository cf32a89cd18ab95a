mod config;
mod env;
mod log;

pub use config::*;
pub use env::*;
pub use log::*;

pub mod future;
pub mod http_utils;
pub mod throttle;
pub mod utils;
pub mod ws;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;
