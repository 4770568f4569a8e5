//! Tracing target prefix and level helpers shared across yieldcast crates.
//!
//! Subscriber installation lives in the server binary. Library spans are
//! named and event targets are set as `yieldcast::<stage>`.

use tracing::Level;

/// Target prefix used by all yieldcast tracing spans and events.
///
/// ```text
/// RUST_LOG=yieldcast=debug
/// ```
pub const TARGET_PREFIX: &str = "yieldcast";

/// Parse a log level string (case-insensitive).
///
/// Recognized values: `trace`, `debug`, `info`, `warn`, `error`.
#[must_use]
pub fn parse_level(s: &str) -> Option<Level> {
    match s.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Checks `YIELDCAST_LOG_LEVEL`, falling back to `default`.
#[must_use]
pub fn level_from_env(default: Level) -> Level {
    std::env::var("YIELDCAST_LOG_LEVEL")
        .ok()
        .and_then(|s| parse_level(&s))
        .unwrap_or(default)
}
