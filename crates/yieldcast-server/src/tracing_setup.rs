//! Log setup for `yieldcast-server`.
//!
//! The server logs to stderr only. Filter directives come from the first
//! source that parses:
//!
//! 1. `YIELDCAST_LOG`, e.g. `yieldcast::select=debug,info`
//! 2. `RUST_LOG`
//! 3. `-v` (info, with `yieldcast=debug`) or `-q` (error)
//! 4. `YIELDCAST_LOG_LEVEL`, else `info`
//!
//! At the default level an operator sees the dataset load summary, the
//! synthetic fallback warning and the bind address. `-v` adds one line per
//! selection, estimate and prediction.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use yieldcast_core::tracing_config;

/// Verbosity level derived from CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// `--quiet` / `-q`: only errors.
    Quiet,
    /// Default: startup, load summaries and warnings.
    Normal,
    /// `--verbose` / `-v`: per-prediction debug output.
    Verbose,
}

impl Verbosity {
    /// Determine verbosity from the parsed CLI flags. `verbose` wins when both are set.
    #[must_use]
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Map to a default `tracing::Level`.
    #[must_use]
    pub const fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Install the stderr subscriber. Called once from `main`, before the
/// config file and dataset are loaded.
///
/// Colors are used only when stderr is a terminal and `no_color` is unset.
/// Verbose runs carry an uptime timestamp; other runs use the compact format.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_subscriber(verbosity: Verbosity, no_color: bool) {
    let filter = build_env_filter(verbosity);

    let use_ansi = !no_color && std::io::IsTerminal::is_terminal(&std::io::stderr());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true);

    if verbosity == Verbosity::Verbose {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.with_timer(fmt::time::uptime()))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.compact())
            .init();
    }
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    let directives = select_directives(
        std::env::var("YIELDCAST_LOG").ok().as_deref(),
        std::env::var("RUST_LOG").ok().as_deref(),
        verbosity,
    );
    EnvFilter::try_new(&directives)
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_level().as_str()))
}

/// First parseable directive string among `yieldcast_log`, `rust_log` and
/// the verbosity fallback.
fn select_directives(
    yieldcast_log: Option<&str>,
    rust_log: Option<&str>,
    verbosity: Verbosity,
) -> String {
    [yieldcast_log, rust_log]
        .into_iter()
        .flatten()
        .find(|d| EnvFilter::try_new(d).is_ok())
        .map_or_else(|| fallback_directive(verbosity), str::to_owned)
}

fn fallback_directive(verbosity: Verbosity) -> String {
    match verbosity {
        Verbosity::Verbose => format!(
            "{level},{prefix}=debug",
            level = Level::INFO,
            prefix = tracing_config::TARGET_PREFIX,
        ),
        Verbosity::Quiet => Level::ERROR.to_string(),
        Verbosity::Normal => tracing_config::level_from_env(Level::INFO).to_string(),
    }
}
