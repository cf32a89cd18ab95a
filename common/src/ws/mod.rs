mod ws_session;

pub use ws_session::*;
