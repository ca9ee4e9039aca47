//! Logging initialization for the client core.
//!
//! All crates in the workspace log through `tracing`; the host application
//! calls [`init_logging`] once at startup. Output goes to stderr, formatted
//! for humans by default and as JSON lines when `TRIVIO_LOG_FORMAT=json`.

use tracing_subscriber::EnvFilter;

/// Initialize the logging system.
///
/// Sets up a tracing subscriber with:
/// - Log level from the `TRIVIO_LOG` env var, falling back to `level`
/// - Human-readable output, or JSONL when `TRIVIO_LOG_FORMAT=json`
///
/// Calling this more than once is harmless; subsequent calls are no-ops.
///
/// # Arguments
///
/// * `level` - Default log level (trace, debug, info, warn, error)
///
/// # Example
///
/// ```ignore
/// init_logging("info");
/// tracing::info!("client core started");
/// ```
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env("TRIVIO_LOG")
        .unwrap_or_else(|_| EnvFilter::new(level));

    let json = std::env::var("TRIVIO_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    // Already-initialized is the only expected failure here (tests, embedders).
    let _ = result;
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
