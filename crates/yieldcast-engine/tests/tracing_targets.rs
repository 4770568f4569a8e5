//! Span names and event targets emitted by one prediction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};
use yieldcast_core::tracing_config::TARGET_PREFIX;
use yieldcast_core::{EngineConfig, FixedJitter, ObservationRecord, YieldQuery};
use yieldcast_engine::YieldPredictor;
use yieldcast_store::RecordStore;

#[derive(Default)]
struct Seen {
    spans: Vec<String>,
    event_targets: Vec<String>,
}

struct Recorder {
    seen: Arc<Mutex<Seen>>,
    next_id: AtomicU64,
}

impl Subscriber for Recorder {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, attrs: &Attributes<'_>) -> Id {
        self.seen
            .lock()
            .expect("recorder lock")
            .spans
            .push(attrs.metadata().name().to_owned());
        Id::from_u64(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn record(&self, _: &Id, _: &Record<'_>) {}

    fn record_follows_from(&self, _: &Id, _: &Id) {}

    fn event(&self, event: &Event<'_>) {
        self.seen
            .lock()
            .expect("recorder lock")
            .event_targets
            .push(event.metadata().target().to_owned());
    }

    fn enter(&self, _: &Id) {}

    fn exit(&self, _: &Id) {}
}

fn predictor() -> YieldPredictor {
    let store = RecordStore::new(vec![ObservationRecord {
        area: "india".into(),
        crop: "wheat".into(),
        year: 2018,
        rainfall: 1000.0,
        pesticides: 100.0,
        temperature: 20.0,
        yield_hg_ha: 40_000.0,
    }]);
    YieldPredictor::new(store, EngineConfig::default())
        .expect("default config is valid")
        .with_jitter(Box::new(FixedJitter::identity()))
}

#[test]
fn prediction_spans_and_events_share_the_target_prefix() {
    let predictor = predictor();
    let seen = Arc::new(Mutex::new(Seen::default()));
    let recorder = Recorder {
        seen: Arc::clone(&seen),
        next_id: AtomicU64::new(1),
    };

    tracing::subscriber::with_default(recorder, || {
        let _ = predictor.predict(&YieldQuery::new("India", "Wheat", 2018, 1000.0, 100.0, 20.0));
    });

    let seen = seen.lock().expect("recorder lock");
    for name in ["yieldcast::predict", "yieldcast::select", "yieldcast::estimate"] {
        assert!(seen.spans.iter().any(|s| s == name), "missing span {name}");
    }
    assert!(seen.event_targets.len() >= 3);
    let prefix = format!("{TARGET_PREFIX}::");
    for target in &seen.event_targets {
        assert!(target.starts_with(&prefix), "event target {target:?}");
    }
}
