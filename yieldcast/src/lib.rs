//! # yieldcast
//!
//! Crop yield estimation by similarity-weighted averaging over historical
//! observations.
//!
//! A query (area, crop, year, rainfall, pesticides, temperature) is matched
//! against the record store in three relaxation tiers, each candidate is
//! weighted by inverse normalized feature distance, and the weighted mean
//! yield is perturbed by a bounded jitter factor.
//!
//! # Quick Start
//!
//! ```rust
//! use yieldcast::prelude::*;
//!
//! let store = RecordStore::synthetic(42);
//! let predictor = YieldPredictor::with_default_config(store)
//!     .with_jitter(Box::new(FixedJitter::identity()));
//!
//! let query = YieldQuery::new("India", "Wheat", 2018, 1100.0, 250.0, 24.0);
//! let prediction = predictor.predict(&query);
//!
//! assert!(prediction.estimate >= 0.0);
//! assert_eq!(prediction.diagnostics.tier, MatchTier::Exact);
//! ```
//!
//! # Pipeline
//!
//! ```text
//!  Query ─► Candidate Selector ─► Similarity Scorer ─► Weighted Estimator ─► Jitter
//!           (exact → partial →     (1 / (1 + Σ |Δ|/scale))  (Σ wᵢyᵢ / Σ wᵢ,        │
//!            whole store)                                     fallback 50000)      ▼
//!                                                                   confidence + insights
//! ```
//!
//! ## Crate Layout
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | [`yieldcast-core`](core) | Types, errors, config, jitter sources, insights |
//! | [`yieldcast-store`](store) | Record store, CSV loader, synthetic dataset |
//! | [`yieldcast-engine`](engine) | Selection, similarity, estimation, `YieldPredictor` |

// ─── Sub-crate module aliases ───────────────────────────────────────────────

/// Core types, traits, errors and configuration.
pub use yieldcast_core as core;
/// Selection, similarity scoring and estimation.
pub use yieldcast_engine as engine;
/// Historical record storage and loading.
pub use yieldcast_store as store;

// ─── Flat import surface ────────────────────────────────────────────────────

pub use yieldcast_core::{
    ConfidenceConfig, EngineConfig, FieldDefaults, FixedJitter, InputBounds, JitterSource,
    MatchTier, ObservationRecord, Prediction, PredictionDiagnostics, RandomJitter,
    SimilarityScales, YieldError, YieldQuery, YieldResult, generate_insights,
};
pub use yieldcast_engine::{CandidateSet, RawEstimate, YieldPredictor, select_candidates, similarity};
pub use yieldcast_store::{DataSource, LoadReport, RecordStore, load_csv_path, load_csv_str};

/// Common imports.
///
/// ```rust
/// use yieldcast::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        EngineConfig, FixedJitter, JitterSource, MatchTier, ObservationRecord, Prediction,
        RandomJitter, RecordStore, YieldError, YieldPredictor, YieldQuery, YieldResult,
    };
}
