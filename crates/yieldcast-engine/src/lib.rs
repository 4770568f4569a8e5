//! Similarity-based yield estimation for yieldcast.
//!
//! This crate provides:
//! - **Selection**: three relaxation tiers (exact → partial → fallback) over the record store.
//! - **Similarity**: inverse Manhattan distance over normalized feature differences.
//! - **Estimation**: similarity-weighted average with a fixed fallback and bounded jitter.
//! - **`YieldPredictor`**: the facade that ties the stages together and adds
//!   confidence and insights.

pub mod estimator;
pub mod predictor;
pub mod selector;
pub mod similarity;

pub use estimator::{RawEstimate, apply_jitter, confidence, raw_estimate, weighted_average};
pub use predictor::YieldPredictor;
pub use selector::{CandidateSet, select_candidates};
pub use similarity::{FeatureDistance, feature_distance, similarity};
