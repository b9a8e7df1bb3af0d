// ==========================================
// Appliance Registry - Logging
// ==========================================
// tracing + tracing-subscriber, level from RUST_LOG
// Output goes to stderr so stdout stays free for JSON summaries
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Selects JSON log lines instead of the human-readable format
pub const LOG_FORMAT_ENV: &str = "APPLIANCE_REGISTRY_LOG_FORMAT";

/// Initializes the global subscriber
///
/// # Environment
/// - RUST_LOG: level filter (default: info),
///   e.g. RUST_LOG=debug or RUST_LOG=appliance_registry::importer=trace
/// - APPLIANCE_REGISTRY_LOG_FORMAT=json: one JSON object per event
///
/// # Example
/// ```no_run
/// use appliance_registry::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Test subscriber at debug level; safe to call from every test
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
