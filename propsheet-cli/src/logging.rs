//! Structured logging with environment variable configuration.
//!
//! Logs are written to stderr so they never mix with JSON written to stdout.

use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;

fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::new(level.as_filter_str())
}

/// Initialise the logging subsystem at the given level.
///
/// If a global subscriber is already set, this function silently ignores
/// the error.
pub fn init_logging(level: LogLevel) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    // The first subscriber wins.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
