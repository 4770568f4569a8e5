//! Prediction facade: select → score → estimate → jitter → confidence → insights.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, instrument};
use yieldcast_core::{
    EngineConfig, JitterSource, Prediction, PredictionDiagnostics, RandomJitter, YieldQuery,
    YieldResult, generate_insights,
};
use yieldcast_store::RecordStore;

use crate::estimator::{RawEstimate, apply_jitter, confidence, raw_estimate};
use crate::selector::select_candidates;

/// Owns the immutable record store and answers yield queries against it.
///
/// `predict` takes `&self`; the only interior mutability is the default
/// jitter generator, locked for a single draw per call. Share one predictor
/// across threads behind an `Arc`.
pub struct YieldPredictor {
    store: RecordStore,
    config: EngineConfig,
    jitter: Mutex<Box<dyn JitterSource>>,
}

impl YieldPredictor {
    /// Create a predictor with an entropy-seeded jitter source.
    ///
    /// # Errors
    ///
    /// Returns `YieldError::InvalidConfig` if `config` fails validation.
    pub fn new(store: RecordStore, config: EngineConfig) -> YieldResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            jitter: Mutex::new(Box::new(RandomJitter::from_entropy())),
        })
    }

    /// Create a predictor with [`EngineConfig::default`].
    #[must_use]
    pub fn with_default_config(store: RecordStore) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
            jitter: Mutex::new(Box::new(RandomJitter::from_entropy())),
        }
    }

    /// Replace the jitter source used by [`predict`](Self::predict).
    #[must_use]
    pub fn with_jitter(mut self, jitter: Box<dyn JitterSource>) -> Self {
        self.jitter = Mutex::new(jitter);
        self
    }

    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The deterministic pre-jitter estimate for `query`.
    #[must_use]
    pub fn raw_estimate(&self, query: &YieldQuery) -> RawEstimate {
        let candidates = select_candidates(&self.store, query, self.config.year_window);
        raw_estimate(&candidates, query, &self.config)
    }

    /// Estimate the yield for `query` using the predictor's jitter source.
    #[must_use]
    #[instrument(
        name = "yieldcast::predict",
        skip(self, query),
        fields(area = %query.area, crop = %query.crop, year = query.year)
    )]
    pub fn predict(&self, query: &YieldQuery) -> Prediction {
        let raw = self.raw_estimate(query);
        let factor = {
            let mut jitter = self.jitter.lock().unwrap_or_else(PoisonError::into_inner);
            jitter.factor(self.config.jitter_min, self.config.jitter_max)
        };
        self.finish(query, raw, factor)
    }

    /// Estimate the yield for `query` drawing jitter from `jitter`.
    #[must_use]
    pub fn predict_with_jitter(
        &self,
        query: &YieldQuery,
        jitter: &mut dyn JitterSource,
    ) -> Prediction {
        let raw = self.raw_estimate(query);
        let factor = jitter.factor(self.config.jitter_min, self.config.jitter_max);
        self.finish(query, raw, factor)
    }

    fn finish(&self, query: &YieldQuery, raw: RawEstimate, factor: f64) -> Prediction {
        let estimate = apply_jitter(raw.value, factor);
        let confidence = confidence(estimate, &self.config.confidence);

        debug!(
            target: "yieldcast::predict",
            tier = %raw.tier,
            candidate_count = raw.candidate_count,
            raw_estimate = raw.value,
            jitter_factor = factor,
            estimate,
            confidence,
            "prediction complete"
        );

        Prediction {
            estimate,
            confidence,
            insights: generate_insights(query, estimate),
            diagnostics: PredictionDiagnostics {
                tier: raw.tier,
                candidate_count: raw.candidate_count,
                weight_sum: raw.weight_sum,
                raw_estimate: raw.value,
                jitter_factor: factor,
            },
        }
    }
}

impl fmt::Debug for YieldPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YieldPredictor")
            .field("records", &self.store.len())
            .field("source", self.store.source())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
