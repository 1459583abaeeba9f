//! Log output for the binaries.
//!
//! The library logs through the `log` facade. The binaries install a
//! `tracing-subscriber` fmt layer, which also picks up `log` records, filtered
//! by `HUBDECK_LOG` (EnvFilter syntax, e.g. `debug` or `hubdeck=trace`;
//! default `warn`). Output goes to stderr so the RPC protocol on stdout stays
//! clean.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "HUBDECK_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Builds the filter from a `HUBDECK_LOG` value. Blank or unparsable values
/// fall back to `warn`.
pub fn filter_from(value: Option<&str>) -> EnvFilter {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the stderr subscriber. Calling it again is harmless.
pub fn init_from_env() {
    let filter = filter_from(std::env::var(LOG_ENV).ok().as_deref());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .try_init();
}
