use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// Normalize a region or crop label: trimmed and lower-cased.
///
/// Both the loader and [`YieldQuery::new`] route labels through this so that
/// equality checks in candidate selection compare like with like.
#[must_use]
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One historical observation of a crop yield.
///
/// Records are immutable once loaded. Every field is populated; rows that
/// cannot produce a complete record are dropped by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Normalized region identifier.
    pub area: String,
    /// Normalized crop identifier.
    pub crop: String,
    /// Agricultural year.
    pub year: i32,
    /// Average rainfall, mm/year.
    pub rainfall: f64,
    /// Pesticide use, tonnes.
    pub pesticides: f64,
    /// Average temperature, °C.
    pub temperature: f64,
    /// Observed yield, hg/ha.
    pub yield_hg_ha: f64,
}

impl ObservationRecord {
    /// Whether this record shares both area and crop with `query`.
    #[must_use]
    pub fn same_area_and_crop(&self, query: &YieldQuery) -> bool {
        self.area == query.area && self.crop == query.crop
    }

    /// Whether this record shares area or crop with `query`.
    #[must_use]
    pub fn shares_area_or_crop(&self, query: &YieldQuery) -> bool {
        self.area == query.area || self.crop == query.crop
    }

    /// Absolute year distance to `query`.
    #[must_use]
    pub const fn year_distance(&self, query: &YieldQuery) -> u32 {
        self.year.abs_diff(query.year)
    }
}

/// The point to estimate: a record without an observed yield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldQuery {
    /// Normalized region identifier.
    pub area: String,
    /// Normalized crop identifier.
    pub crop: String,
    /// Agricultural year.
    pub year: i32,
    /// Average rainfall, mm/year.
    pub rainfall: f64,
    /// Pesticide use, tonnes.
    pub pesticides: f64,
    /// Average temperature, °C.
    pub temperature: f64,
}

impl YieldQuery {
    /// Creates a query, normalizing `area` and `crop`.
    #[must_use]
    pub fn new(
        area: &str,
        crop: &str,
        year: i32,
        rainfall: f64,
        pesticides: f64,
        temperature: f64,
    ) -> Self {
        Self {
            area: normalize_label(area),
            crop: normalize_label(crop),
            year,
            rainfall,
            pesticides,
            temperature,
        }
    }

    /// Builds the query matching a record's features exactly.
    #[must_use]
    pub fn from_record(record: &ObservationRecord) -> Self {
        Self {
            area: record.area.clone(),
            crop: record.crop.clone(),
            year: record.year,
            rainfall: record.rainfall,
            pesticides: record.pesticides,
            temperature: record.temperature,
        }
    }
}

// ---------------------------------------------------------------------------
// Prediction types
// ---------------------------------------------------------------------------

/// Which relaxation tier produced the candidate set for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Same area and crop, within the year window.
    Exact,
    /// Same area or same crop, any year.
    Partial,
    /// The whole store.
    Fallback,
    /// The store is empty; no candidates at all.
    Empty,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Partial => write!(f, "partial"),
            Self::Fallback => write!(f, "fallback"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// Diagnostics from a single prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionDiagnostics {
    /// Tier that produced the candidate set.
    pub tier: MatchTier,
    /// Number of candidates that were weighted.
    pub candidate_count: usize,
    /// Sum of similarity weights over the candidates.
    pub weight_sum: f64,
    /// Weighted average before jitter (or the fallback yield).
    pub raw_estimate: f64,
    /// Multiplicative jitter factor applied to `raw_estimate`.
    pub jitter_factor: f64,
}

/// Result of a prediction: the estimate plus its display companions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Estimated yield, hg/ha. Always finite and `>= 0`.
    pub estimate: f64,
    /// Heuristic display confidence in `[60, 95]`. Not a statistical interval.
    pub confidence: f64,
    /// Advisory strings in fixed order: rainfall, temperature, pesticides, yield.
    pub insights: Vec<String>,
    /// How the estimate was produced.
    pub diagnostics: PredictionDiagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ObservationRecord {
        ObservationRecord {
            area: "india".into(),
            crop: "wheat".into(),
            year: 2020,
            rainfall: 1000.0,
            pesticides: 100.0,
            temperature: 20.0,
            yield_hg_ha: 60_000.0,
        }
    }

    #[test]
    fn normalize_label_trims_and_lowercases() {
        assert_eq!(normalize_label("  India "), "india");
        assert_eq!(normalize_label("Rice, paddy"), "rice, paddy");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn query_new_normalizes_labels() {
        let q = YieldQuery::new(" INDIA", "Wheat ", 2020, 1000.0, 100.0, 20.0);
        assert_eq!(q.area, "india");
        assert_eq!(q.crop, "wheat");
    }

    #[test]
    fn from_record_copies_features() {
        let r = record();
        let q = YieldQuery::from_record(&r);
        assert!(r.same_area_and_crop(&q));
        assert_eq!(r.year_distance(&q), 0);
        assert!((q.rainfall - r.rainfall).abs() < f64::EPSILON);
    }

    #[test]
    fn area_or_crop_match_is_a_union() {
        let r = record();
        let other_area = YieldQuery::new("usa", "wheat", 2020, 0.0, 0.0, 0.0);
        let other_crop = YieldQuery::new("india", "rice", 2020, 0.0, 0.0, 0.0);
        let neither = YieldQuery::new("usa", "rice", 2020, 0.0, 0.0, 0.0);
        assert!(r.shares_area_or_crop(&other_area));
        assert!(r.shares_area_or_crop(&other_crop));
        assert!(!r.shares_area_or_crop(&neither));
        assert!(!r.same_area_and_crop(&other_area));
    }

    #[test]
    fn year_distance_is_symmetric() {
        let r = record();
        let early = YieldQuery::new("india", "wheat", 2014, 0.0, 0.0, 0.0);
        let late = YieldQuery::new("india", "wheat", 2026, 0.0, 0.0, 0.0);
        assert_eq!(r.year_distance(&early), 6);
        assert_eq!(r.year_distance(&late), 6);
    }

    #[test]
    fn match_tier_serializes_snake_case() {
        let json = serde_json::to_string(&MatchTier::Fallback).unwrap();
        assert_eq!(json, "\"fallback\"");
        assert_eq!(MatchTier::Exact.to_string(), "exact");
    }
}
