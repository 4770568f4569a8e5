//! Configuration types for the yieldcast estimation pipeline.
//!
//! [`EngineConfig`] holds every tuning constant used by candidate selection,
//! similarity scoring, estimation and the confidence heuristic.
//! [`FieldDefaults`] is the sentinel table the loader uses for absent numeric
//! fields, and [`InputBounds`] the static ranges enforced by the API layer.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{YieldError, YieldResult};

/// Per-feature normalization constants for the similarity metric.
///
/// Each value is the "typical range" of its feature; a difference of one
/// full scale contributes `1.0` to the distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityScales {
    /// Years. Default: 10.
    pub year: f64,
    /// Rainfall, mm/year. Default: 2000.
    pub rainfall: f64,
    /// Temperature, °C. Default: 30.
    pub temperature: f64,
    /// Pesticides, tonnes. Default: 1000.
    pub pesticides: f64,
}

impl Default for SimilarityScales {
    fn default() -> Self {
        Self {
            year: 10.0,
            rainfall: 2000.0,
            temperature: 30.0,
            pesticides: 1000.0,
        }
    }
}

/// Parameters of the display confidence heuristic.
///
/// ```text
/// confidence = clamp(100 - |estimate - typical_yield| / scale, min, max)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Yield treated as "typical". Default: 50000.
    pub typical_yield: f64,
    /// Yield distance costing one confidence point. Default: 1000.
    pub scale: f64,
    /// Lower clamp. Default: 60.
    pub min: f64,
    /// Upper clamp. Default: 95.
    pub max: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            typical_yield: 50_000.0,
            scale: 1000.0,
            min: 60.0,
            max: 95.0,
        }
    }
}

/// Configuration for the similarity-based estimation pipeline.
///
/// # Environment Variable Overrides
///
/// | Variable                   | Field            | Default   |
/// |----------------------------|------------------|-----------|
/// | `YIELDCAST_YEAR_WINDOW`    | `year_window`    | `5`       |
/// | `YIELDCAST_FALLBACK_YIELD` | `fallback_yield` | `50000`   |
/// | `YIELDCAST_JITTER_MIN`     | `jitter_min`     | `0.8`     |
/// | `YIELDCAST_JITTER_MAX`     | `jitter_max`     | `1.2`     |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum year distance for the exact tier. Default: 5.
    pub year_window: u32,
    /// Similarity normalization constants.
    pub scales: SimilarityScales,
    /// Estimate used when no candidate carries weight. Default: 50000.
    pub fallback_yield: f64,
    /// Lower bound of the multiplicative jitter band. Default: 0.8.
    pub jitter_min: f64,
    /// Upper bound of the multiplicative jitter band. Default: 1.2.
    pub jitter_max: f64,
    /// Confidence heuristic parameters.
    pub confidence: ConfidenceConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            year_window: 5,
            scales: SimilarityScales::default(),
            fallback_yield: 50_000.0,
            jitter_min: 0.8,
            jitter_max: 1.2,
            confidence: ConfidenceConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Apply overrides from an explicit variable map.
    ///
    /// Unparseable values are ignored. `YIELDCAST_JITTER_MIN` and
    /// `YIELDCAST_JITTER_MAX` are merged into one band first and applied
    /// together only when the band is ordered; otherwise both are dropped
    /// with a warning.
    #[must_use]
    #[allow(clippy::implicit_hasher)]
    pub fn with_env_map(mut self, env: &HashMap<String, String>) -> Self {
        if let Some(val) = env.get("YIELDCAST_YEAR_WINDOW")
            && let Ok(window) = val.parse::<u32>()
        {
            self.year_window = window;
        }
        if let Some(val) = env.get("YIELDCAST_FALLBACK_YIELD")
            && let Ok(fallback) = val.parse::<f64>()
            && fallback.is_finite()
            && fallback >= 0.0
        {
            self.fallback_yield = fallback;
        }

        let min = env_f64(env, "YIELDCAST_JITTER_MIN").filter(|v| *v >= 0.0);
        let max = env_f64(env, "YIELDCAST_JITTER_MAX");
        if min.is_some() || max.is_some() {
            let band_min = min.unwrap_or(self.jitter_min);
            let band_max = max.unwrap_or(self.jitter_max);
            if band_min <= band_max {
                self.jitter_min = band_min;
                self.jitter_max = band_max;
            } else {
                warn!(
                    jitter_min = band_min,
                    jitter_max = band_max,
                    "ignoring inverted jitter band from environment"
                );
            }
        }
        self
    }

    /// Check every field for values that would break the estimator's
    /// non-negative, finite output guarantee.
    ///
    /// # Errors
    ///
    /// Returns [`YieldError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> YieldResult<()> {
        let scales = [
            ("scales.year", self.scales.year),
            ("scales.rainfall", self.scales.rainfall),
            ("scales.temperature", self.scales.temperature),
            ("scales.pesticides", self.scales.pesticides),
            ("confidence.scale", self.confidence.scale),
        ];
        for (field, value) in scales {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, value, "must be finite and > 0"));
            }
        }
        if !(self.fallback_yield.is_finite() && self.fallback_yield >= 0.0) {
            return Err(invalid(
                "fallback_yield",
                self.fallback_yield,
                "must be finite and >= 0",
            ));
        }
        if !(self.jitter_min.is_finite() && self.jitter_min >= 0.0) {
            return Err(invalid(
                "jitter_min",
                self.jitter_min,
                "must be finite and >= 0",
            ));
        }
        if !(self.jitter_max.is_finite() && self.jitter_max >= self.jitter_min) {
            return Err(invalid(
                "jitter_max",
                self.jitter_max,
                "must be finite and >= jitter_min",
            ));
        }
        if !(self.confidence.min <= self.confidence.max) {
            return Err(invalid(
                "confidence.min",
                self.confidence.min,
                "must be <= confidence.max",
            ));
        }
        Ok(())
    }
}

fn env_f64(env: &HashMap<String, String>, key: &str) -> Option<f64> {
    env.get(key)
        .and_then(|val| val.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn invalid(field: &str, value: f64, reason: &str) -> YieldError {
    YieldError::InvalidConfig {
        field: field.to_owned(),
        value: value.to_string(),
        reason: reason.to_owned(),
    }
}

/// Values substituted for absent or blank numeric fields during loading.
///
/// Keeping the policy in one table makes it auditable: a row with a blank
/// `avg_temp` is stored with `temperature` instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDefaults {
    /// Default: 2020.
    pub year: i32,
    /// Default: 1000 mm/year.
    pub rainfall: f64,
    /// Default: 100 tonnes.
    pub pesticides: f64,
    /// Default: 20 °C.
    pub temperature: f64,
    /// Default: 0 hg/ha.
    pub yield_hg_ha: f64,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            year: 2020,
            rainfall: 1000.0,
            pesticides: 100.0,
            temperature: 20.0,
            yield_hg_ha: 0.0,
        }
    }
}

/// Closed numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Range<T> {
    #[must_use]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Static input ranges enforced before a query reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBounds {
    /// Default: 1990..=2030.
    pub year: Range<i32>,
    /// Default: 0..=5000 mm.
    pub rainfall: Range<f64>,
    /// Default: 0..=10000 tonnes.
    pub pesticides: Range<f64>,
    /// Default: -50..=50 °C.
    pub temperature: Range<f64>,
}

impl Default for InputBounds {
    fn default() -> Self {
        Self {
            year: Range::new(1990, 2030),
            rainfall: Range::new(0.0, 5000.0),
            pesticides: Range::new(0.0, 10_000.0),
            temperature: Range::new(-50.0, 50.0),
        }
    }
}

/// Parse a TOML file into `T`, falling back to `T::default()` when the file is
/// missing or malformed.
#[must_use]
pub fn load_toml_or_default<T>(path: &Path) -> T
where
    T: Default + for<'de> Deserialize<'de>,
{
    std::fs::read_to_string(path).map_or_else(
        |_| T::default(),
        |contents| match toml::from_str::<T>(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                T::default()
            }
        },
    )
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

    fn temp_path(name: &str) -> std::path::PathBuf {
        let unique = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "yieldcast-config-{name}-{}-{unique}.toml",
            std::process::id()
        ))
    }

    #[test]
    fn default_engine_values() {
        let config = EngineConfig::default();
        assert_eq!(config.year_window, 5);
        assert!((config.scales.year - 10.0).abs() < 1e-12);
        assert!((config.scales.rainfall - 2000.0).abs() < 1e-12);
        assert!((config.scales.temperature - 30.0).abs() < 1e-12);
        assert!((config.scales.pesticides - 1000.0).abs() < 1e-12);
        assert!((config.fallback_yield - 50_000.0).abs() < 1e-12);
        assert!((config.jitter_min - 0.8).abs() < 1e-12);
        assert!((config.jitter_max - 1.2).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_field_table() {
        let defaults = FieldDefaults::default();
        assert_eq!(defaults.year, 2020);
        assert!((defaults.rainfall - 1000.0).abs() < 1e-12);
        assert!((defaults.pesticides - 100.0).abs() < 1e-12);
        assert!((defaults.temperature - 20.0).abs() < 1e-12);
        assert!(defaults.yield_hg_ha.abs() < 1e-12);
    }

    #[test]
    fn default_bounds_are_inclusive() {
        let bounds = InputBounds::default();
        assert!(bounds.year.contains(1990));
        assert!(bounds.year.contains(2030));
        assert!(!bounds.year.contains(2031));
        assert!(bounds.rainfall.contains(0.0));
        assert!(!bounds.rainfall.contains(-0.1));
        assert!(bounds.temperature.contains(-50.0));
        assert!(!bounds.pesticides.contains(10_000.5));
    }

    #[test]
    fn env_map_overrides_valid_values() {
        let config = EngineConfig::default().with_env_map(&env(&[
            ("YIELDCAST_YEAR_WINDOW", "3"),
            ("YIELDCAST_FALLBACK_YIELD", "42000"),
            ("YIELDCAST_JITTER_MIN", "1.0"),
            ("YIELDCAST_JITTER_MAX", "1.0"),
        ]));
        assert_eq!(config.year_window, 3);
        assert!((config.fallback_yield - 42_000.0).abs() < 1e-12);
        assert!((config.jitter_min - 1.0).abs() < 1e-12);
        assert!((config.jitter_max - 1.0).abs() < 1e-12);
    }

    #[test]
    fn env_map_ignores_invalid_values() {
        let config = EngineConfig::default().with_env_map(&env(&[
            ("YIELDCAST_YEAR_WINDOW", "-2"),
            ("YIELDCAST_FALLBACK_YIELD", "NaN"),
            ("YIELDCAST_JITTER_MIN", "1.5"),
            ("YIELDCAST_JITTER_MAX", "0.1"),
        ]));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn env_map_moves_jitter_band_upward_as_a_pair() {
        let config = EngineConfig::default().with_env_map(&env(&[
            ("YIELDCAST_JITTER_MIN", "1.3"),
            ("YIELDCAST_JITTER_MAX", "1.5"),
        ]));
        assert!((config.jitter_min - 1.3).abs() < 1e-12);
        assert!((config.jitter_max - 1.5).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_map_single_jitter_bound_checked_against_current_band() {
        let lowered = EngineConfig::default()
            .with_env_map(&env(&[("YIELDCAST_JITTER_MIN", "0.5")]));
        assert!((lowered.jitter_min - 0.5).abs() < 1e-12);
        assert!((lowered.jitter_max - 1.2).abs() < 1e-12);

        let inverted = EngineConfig::default()
            .with_env_map(&env(&[("YIELDCAST_JITTER_MAX", "0.5")]));
        assert_eq!(inverted, EngineConfig::default());
    }

    #[test]
    fn validate_rejects_zero_scale() {
        let mut config = EngineConfig::default();
        config.scales.rainfall = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scales.rainfall"));
    }

    #[test]
    fn validate_rejects_inverted_jitter_band() {
        let config = EngineConfig {
            jitter_min: 1.3,
            jitter_max: 1.1,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("jitter_max"));
    }

    #[test]
    fn validate_rejects_negative_fallback() {
        let config = EngineConfig {
            fallback_yield: -1.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_merges_with_defaults() {
        let path = temp_path("partial");
        std::fs::write(&path, "year_window = 7\n[scales]\nrainfall = 1500.0\n")
            .expect("write partial config");
        let loaded: EngineConfig = load_toml_or_default(&path);
        assert_eq!(loaded.year_window, 7);
        assert!((loaded.scales.rainfall - 1500.0).abs() < 1e-12);
        assert!((loaded.scales.year - 10.0).abs() < 1e-12);
        assert!((loaded.fallback_yield - 50_000.0).abs() < 1e-12);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_or_invalid_toml_falls_back_to_default() {
        let missing = temp_path("missing");
        let from_missing: EngineConfig = load_toml_or_default(&missing);
        assert_eq!(from_missing, EngineConfig::default());

        let invalid = temp_path("invalid");
        std::fs::write(&invalid, "year_window = \"soon\"").expect("write invalid config");
        let from_invalid: EngineConfig = load_toml_or_default(&invalid);
        assert_eq!(from_invalid, EngineConfig::default());
        let _ = std::fs::remove_file(&invalid);
    }

    #[test]
    fn engine_config_serialization_roundtrip() {
        let config = EngineConfig {
            year_window: 2,
            fallback_yield: 12_345.0,
            ..EngineConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let decoded: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, config);
    }
}
