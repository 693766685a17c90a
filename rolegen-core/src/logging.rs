//! Logging setup.
//!
//! Structured logging is controlled by environment variables:
//!
//! - `ROLEGEN_DEBUG=true` (or `1`, `yes`) - enable debug logging
//! - `ROLEGEN_LOG_LEVEL=trace|debug|info|warn|error` - set a specific level
//! - `ROLEGEN_LOG_FORMAT=json|pretty|compact` - output format (default: compact)
//!
//! Nothing is installed unless one of the first two is set or a level is
//! passed to [`init_with_level`]. Inside the workspace use the `tracing`
//! macros directly:
//!
//! ```rust,ignore
//! use tracing::{debug, info};
//!
//! debug!(table = %name, "Table restricted");
//! info!(roles = n, "Security matrix compiled");
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Crates whose events are shown.
const TARGETS: &[&str] = &["rolegen", "rolegen_core", "rolegen_mssql", "rolegen_cli"];

/// Check if `ROLEGEN_DEBUG` enables debug logging.
pub fn is_debug_enabled() -> bool {
    env::var("ROLEGEN_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Normalize a level name, falling back to `None` for unknown names.
pub fn parse_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Get the log level from `ROLEGEN_LOG_LEVEL`, defaulting to `debug` when
/// `ROLEGEN_DEBUG` is on and `warn` otherwise.
pub fn get_log_level() -> &'static str {
    env::var("ROLEGEN_LOG_LEVEL")
        .ok()
        .and_then(|level| parse_level(&level))
        .unwrap_or(if is_debug_enabled() { "debug" } else { "warn" })
}

/// Get the output format from `ROLEGEN_LOG_FORMAT`.
pub fn get_log_format() -> &'static str {
    env::var("ROLEGEN_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "json" => "json",
            "pretty" => "pretty",
            _ => "compact",
        })
        .unwrap_or("compact")
}

/// Build the `EnvFilter` directive string for a level.
pub fn filter_directive(level: &str) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize logging from the environment. Later calls are no-ops.
pub fn init() {
    if !is_debug_enabled() && env::var("ROLEGEN_LOG_LEVEL").is_err() {
        return;
    }
    install(get_log_level());
}

/// Initialize logging at an explicit level, ignoring `ROLEGEN_LOG_LEVEL`.
pub fn init_with_level(level: &str) {
    install(parse_level(level).unwrap_or("warn"));
}

fn install(level: &'static str) {
    INIT.call_once(|| {
        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter = EnvFilter::try_new(filter_directive(level))
                .unwrap_or_else(|_| EnvFilter::new("warn"));

            // Logs go to stderr so JSON printed on stdout stays parseable.
            match get_log_format() {
                "json" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json().with_writer(std::io::stderr))
                        .init();
                }
                "pretty" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty().with_writer(std::io::stderr))
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact().with_writer(std::io::stderr))
                        .init();
                }
            }

            tracing::debug!(level = level, format = get_log_format(), "Logging initialized");
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        {
            let _ = level;
        }
    });
}
