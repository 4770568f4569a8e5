//! Inverse-distance similarity between a record and a query.
//!
//! ```text
//! distance = |Δyear|/10 + |Δrainfall|/2000 + |Δtemperature|/30 + |Δpesticides|/1000
//! weight   = 1 / (1 + distance)
//! ```
//!
//! The scale constants come from [`SimilarityScales`]. For finite inputs the
//! weight lies in `(0, 1]` and equals `1.0` only when every term is zero.

use yieldcast_core::{ObservationRecord, SimilarityScales, YieldQuery};

/// Per-feature normalized absolute differences.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureDistance {
    pub year: f64,
    pub rainfall: f64,
    pub temperature: f64,
    pub pesticides: f64,
}

impl FeatureDistance {
    /// Manhattan combination of the four terms.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.year + self.rainfall + self.temperature + self.pesticides
    }
}

/// Compute the normalized per-feature distances.
#[must_use]
pub fn feature_distance(
    record: &ObservationRecord,
    query: &YieldQuery,
    scales: &SimilarityScales,
) -> FeatureDistance {
    FeatureDistance {
        year: f64::from(record.year_distance(query)) / scales.year,
        rainfall: (record.rainfall - query.rainfall).abs() / scales.rainfall,
        temperature: (record.temperature - query.temperature).abs() / scales.temperature,
        pesticides: (record.pesticides - query.pesticides).abs() / scales.pesticides,
    }
}

/// Similarity weight of `record` relative to `query`.
///
/// A NaN distance (non-finite query input) maps to a weight of `0.0`, which
/// the estimator treats the same as an empty candidate set.
#[must_use]
pub fn similarity(record: &ObservationRecord, query: &YieldQuery, scales: &SimilarityScales) -> f64 {
    let weight = 1.0 / (1.0 + feature_distance(record, query, scales).total());
    if weight.is_nan() { 0.0 } else { weight }
}
