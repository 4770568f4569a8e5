//! Core types, traits, and error types for the yieldcast crop-yield estimator.
//!
//! This crate defines the observation and query types (`ObservationRecord`,
//! `YieldQuery`), prediction results (`Prediction`, `MatchTier`), the error
//! type (`YieldError`), pipeline configuration, the `JitterSource` seam and
//! insight generation shared by every other crate in the workspace.

pub mod config;
pub mod error;
pub mod insights;
pub mod tracing_config;
pub mod traits;
pub mod types;

pub use config::{
    ConfidenceConfig, EngineConfig, FieldDefaults, InputBounds, Range, SimilarityScales,
    load_toml_or_default,
};
pub use error::{YieldError, YieldResult};
pub use insights::generate_insights;
pub use traits::{FixedJitter, JitterSource, RandomJitter};
pub use types::{
    MatchTier, ObservationRecord, Prediction, PredictionDiagnostics, YieldQuery, normalize_label,
};
