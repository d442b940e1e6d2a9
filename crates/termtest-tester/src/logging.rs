//! Diagnostic logging to stderr.
//!
//! Stdout belongs to the harness contract, so the subscriber never writes
//! there. The filter is read from [`LOG_ENV`] and defaults to `warn`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "TERMTEST_LOG";

const DEFAULT_FILTER: &str = "warn";

fn filter_from(value: Option<&str>) -> EnvFilter {
    value
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init() {
    let filter = filter_from(std::env::var(LOG_ENV).ok().as_deref());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
