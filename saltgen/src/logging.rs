//! Console tracing setup for the binary. The library only emits events;
//! installing a subscriber is left to whoever embeds it.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const FALLBACK_FILTER: &str = "warn";

/// Builds the filter from `RUST_LOG`, then `default_filter`, then `warn`.
pub fn build_filter(default_filter: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter.unwrap_or(FALLBACK_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

pub fn setup_tracing(default_filter: Option<&str>) {
    let format = tracing_subscriber::fmt::format()
        .with_ansi(false)
        .without_time();

    let layer = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_writer(std::io::stderr)
        .with_filter(build_filter(default_filter));

    Registry::default().with(layer).init();
    tracing::debug!("Tracing initialized [reporting to stderr]");
}
