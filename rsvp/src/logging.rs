//! Tracing setup for the bridge.
//!
//! Reads `RUST_LOG`. Defaults to `info` for the bridge crates and `warn`
//! for everything else. Output: stderr, compact format.
//!
//! # Example
//! ```bash
//! RUST_LOG=rsvp=debug rsvp-server --port 4500
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn,rsvp=info,rsvp_server=info";

/// Initialize the global tracing subscriber.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
