//! Tracing subscriber setup for the binary.
//!
//! `RUST_LOG` wins when set; otherwise the level follows the `-v` count.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for a given `-v` count.
///
/// ```
/// use eda_report::logging::filter_for_verbosity;
/// assert_eq!(filter_for_verbosity(0), "info");
/// assert_eq!(filter_for_verbosity(1), "info,eda_report=debug");
/// assert_eq!(filter_for_verbosity(5), "debug,eda_report=trace");
/// ```
pub fn filter_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "info,eda_report=debug",
        _ => "debug,eda_report=trace",
    }
}

/// Installs the global subscriber, logging to stderr.
///
/// Returns an error if a global subscriber is already set.
pub fn init_logging(verbosity: u8) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(verbosity)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
}
