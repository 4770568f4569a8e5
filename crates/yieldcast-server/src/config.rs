//! Server configuration: bind address, data source and the engine settings.
//!
//! Precedence, lowest to highest: built-in defaults, TOML file, environment
//! variables, CLI flags.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;
use yieldcast_core::{EngineConfig, FieldDefaults, InputBounds, YieldResult, load_toml_or_default};

use crate::cli::CliArgs;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default location of the historical dataset.
pub const DEFAULT_DATA_PATH: &str = "data/yield_df.csv";

/// Default seed for the synthetic fallback dataset.
pub const DEFAULT_SYNTHETIC_SEED: u64 = 42;

/// Full configuration of the HTTP service.
///
/// # Environment Variable Overrides
///
/// | Variable              | Field            |
/// |-----------------------|------------------|
/// | `YIELDCAST_BIND`      | `bind_addr`      |
/// | `YIELDCAST_DATA_PATH` | `data_path`      |
/// | `YIELDCAST_SEED`      | `synthetic_seed` |
///
/// Engine variables (`YIELDCAST_YEAR_WINDOW`, ...) are forwarded to
/// [`EngineConfig::with_env_map`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub data_path: PathBuf,
    pub synthetic_seed: u64,
    pub engine: EngineConfig,
    pub defaults: FieldDefaults,
    pub bounds: InputBounds,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            synthetic_seed: DEFAULT_SYNTHETIC_SEED,
            engine: EngineConfig::default(),
            defaults: FieldDefaults::default(),
            bounds: InputBounds::default(),
        }
    }
}

impl ServerConfig {
    /// Load a TOML config file.
    ///
    /// A missing file yields the defaults silently; a malformed one yields
    /// the defaults with a warning.
    #[must_use]
    pub fn from_toml_file(path: &Path) -> Self {
        load_toml_or_default(path)
    }

    /// Apply overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        let env: HashMap<String, String> = std::env::vars().collect();
        self.with_env_map(&env)
    }

    /// Apply overrides from an explicit variable map. Unparseable values are ignored.
    #[must_use]
    #[allow(clippy::implicit_hasher)]
    pub fn with_env_map(mut self, env: &HashMap<String, String>) -> Self {
        if let Some(val) = env.get("YIELDCAST_BIND") {
            match val.parse::<SocketAddr>() {
                Ok(addr) => self.bind_addr = addr,
                Err(_) => warn!(value = %val, "ignoring unparseable YIELDCAST_BIND"),
            }
        }
        if let Some(val) = env.get("YIELDCAST_DATA_PATH")
            && !val.trim().is_empty()
        {
            self.data_path = PathBuf::from(val);
        }
        if let Some(val) = env.get("YIELDCAST_SEED")
            && let Ok(seed) = val.parse::<u64>()
        {
            self.synthetic_seed = seed;
        }
        self.engine = self.engine.with_env_map(env);
        self
    }

    /// Apply CLI flag overrides.
    #[must_use]
    pub fn with_cli(mut self, args: &CliArgs) -> Self {
        if let Some(path) = &args.data_path {
            self.data_path.clone_from(path);
        }
        if let Some(addr) = args.bind_addr {
            self.bind_addr = addr;
        }
        self
    }

    /// Resolve the effective configuration for `args`: file, then environment, then flags.
    ///
    /// # Errors
    ///
    /// Returns `YieldError::InvalidConfig` if the merged engine settings are invalid.
    pub fn resolve(args: &CliArgs) -> YieldResult<Self> {
        let base = args
            .config_path
            .as_deref()
            .map_or_else(Self::default, Self::from_toml_file);
        let config = base.with_env_overrides().with_cli(args);
        config.engine.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn temp_toml(name: &str, contents: &str) -> PathBuf {
        let unique = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "yieldcast-server-{name}-{}-{unique}.toml",
            std::process::id()
        ));
        std::fs::write(&path, contents).expect("write toml fixture");
        path
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:5000");
        assert_eq!(config.data_path, PathBuf::from("data/yield_df.csv"));
        assert_eq!(config.synthetic_seed, 42);
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn toml_file_overrides_selected_fields() {
        let path = temp_toml(
            "partial",
            r#"
bind_addr = "127.0.0.1:8088"
synthetic_seed = 7

[engine]
year_window = 3

[bounds.year]
min = 2000
max = 2025
"#,
        );
        let config = ServerConfig::from_toml_file(&path);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8088");
        assert_eq!(config.synthetic_seed, 7);
        assert_eq!(config.engine.year_window, 3);
        assert!((config.engine.fallback_yield - 50_000.0).abs() < f64::EPSILON);
        assert_eq!(config.bounds.year.min, 2000);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn malformed_toml_falls_back_to_defaults() {
        let path = temp_toml("malformed", "bind_addr = [not valid");
        assert_eq!(ServerConfig::from_toml_file(&path), ServerConfig::default());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = ServerConfig::from_toml_file(Path::new("/nonexistent/yieldcast.toml"));
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn env_map_overrides_server_and_engine_fields() {
        let config = ServerConfig::default().with_env_map(&env(&[
            ("YIELDCAST_BIND", "127.0.0.1:9000"),
            ("YIELDCAST_DATA_PATH", "/srv/yield.csv"),
            ("YIELDCAST_SEED", "99"),
            ("YIELDCAST_YEAR_WINDOW", "2"),
        ]));
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.data_path, PathBuf::from("/srv/yield.csv"));
        assert_eq!(config.synthetic_seed, 99);
        assert_eq!(config.engine.year_window, 2);
    }

    #[test]
    fn env_map_ignores_unparseable_values() {
        let config = ServerConfig::default().with_env_map(&env(&[
            ("YIELDCAST_BIND", "not-an-address"),
            ("YIELDCAST_DATA_PATH", "  "),
            ("YIELDCAST_SEED", "-1"),
        ]));
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn env_jitter_band_survives_validation() {
        let config = ServerConfig::default().with_env_map(&env(&[
            ("YIELDCAST_JITTER_MIN", "1.3"),
            ("YIELDCAST_JITTER_MAX", "1.5"),
        ]));
        assert!((config.engine.jitter_min - 1.3).abs() < 1e-12);
        assert!((config.engine.jitter_max - 1.5).abs() < 1e-12);
        assert!(config.engine.validate().is_ok());
    }

    #[test]
    fn cli_flags_take_precedence() {
        let args = CliArgs {
            data_path: Some(PathBuf::from("fixtures/small.csv")),
            bind_addr: Some("127.0.0.1:0".parse().expect("addr")),
            ..CliArgs::default()
        };
        let config = ServerConfig::default()
            .with_env_map(&env(&[("YIELDCAST_DATA_PATH", "/srv/yield.csv")]))
            .with_cli(&args);
        assert_eq!(config.data_path, PathBuf::from("fixtures/small.csv"));
        assert_eq!(config.bind_addr.port(), 0);
    }
}
