//! Similarity-weighted yield aggregation.
//!
//! ```text
//! raw       = Σ(wᵢ · yieldᵢ) / Σwᵢ        (fallback_yield if Σwᵢ ≤ 0)
//! estimate  = max(0, raw · jitter)         jitter ∈ [jitter_min, jitter_max]
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use yieldcast_core::{ConfidenceConfig, EngineConfig, MatchTier, YieldQuery};

use crate::selector::CandidateSet;
use crate::similarity::similarity;

/// The deterministic, pre-jitter estimate for one query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawEstimate {
    /// Tier that produced the candidates.
    pub tier: MatchTier,
    /// Number of candidates aggregated.
    pub candidate_count: usize,
    /// Σwᵢ over the candidates.
    pub weight_sum: f64,
    /// Weighted average, or the fallback yield.
    pub value: f64,
    /// Whether `value` is the configured fallback rather than an average.
    pub used_fallback: bool,
}

/// Weighted mean of `(weight, value)` pairs.
///
/// Returns `(mean, weight_sum)`, or `None` when the weight sum is not
/// strictly positive or the mean is not finite.
#[must_use]
pub fn weighted_average(pairs: impl IntoIterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    let (weighted_sum, weight_sum) = pairs
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(acc, total), (weight, value)| {
            (weight.mul_add(value, acc), total + weight)
        });
    if !(weight_sum > 0.0) {
        return None;
    }
    let mean = weighted_sum / weight_sum;
    mean.is_finite().then_some((mean, weight_sum))
}

/// Aggregate candidate yields by similarity weight.
#[must_use]
#[instrument(
    name = "yieldcast::estimate",
    skip_all,
    fields(tier = %candidates.tier(), candidate_count = candidates.len())
)]
pub fn raw_estimate(
    candidates: &CandidateSet<'_>,
    query: &YieldQuery,
    config: &EngineConfig,
) -> RawEstimate {
    let pairs = candidates
        .iter()
        .map(|record| (similarity(record, query, &config.scales), record.yield_hg_ha));

    let (value, weight_sum, used_fallback) = match weighted_average(pairs) {
        Some((mean, weight_sum)) => (mean, weight_sum, false),
        None => (config.fallback_yield, 0.0, true),
    };

    debug!(
        target: "yieldcast::estimate",
        weight_sum,
        raw_estimate = value,
        used_fallback,
        "weighted estimate computed"
    );

    RawEstimate {
        tier: candidates.tier(),
        candidate_count: candidates.len(),
        weight_sum,
        value,
        used_fallback,
    }
}

/// Scale `raw` by `factor` and floor at zero.
///
/// Non-finite products collapse to `0.0`, so the result is always finite and
/// non-negative.
#[must_use]
pub fn apply_jitter(raw: f64, factor: f64) -> f64 {
    let jittered = raw * factor;
    if jittered.is_finite() {
        jittered.max(0.0)
    } else {
        0.0
    }
}

/// Display confidence: decreases with distance from the typical yield,
/// clamped to `[min, max]`.
#[must_use]
pub fn confidence(estimate: f64, config: &ConfidenceConfig) -> f64 {
    let score = 100.0 - (estimate - config.typical_yield).abs() / config.scale;
    score.max(config.min).min(config.max)
}
