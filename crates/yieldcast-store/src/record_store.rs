//! The read-only historical record store.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use yieldcast_core::{FieldDefaults, ObservationRecord};

use crate::loader::load_csv_path;
use crate::synthetic::demo_records;

/// Where the records in a [`RecordStore`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// Parsed from a CSV file.
    File { path: PathBuf },
    /// Generated demo data.
    Synthetic { seed: u64 },
    /// Supplied directly by the caller.
    InMemory,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path } => write!(f, "file:{}", path.display()),
            Self::Synthetic { seed } => write!(f, "synthetic(seed={seed})"),
            Self::InMemory => write!(f, "in-memory"),
        }
    }
}

/// Immutable, ordered collection of historical observations.
///
/// Built once and never mutated afterwards: there is no `&mut self` API, so a
/// store can be shared across threads behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<ObservationRecord>,
    areas: Vec<String>,
    crops: Vec<String>,
    source: DataSource,
}

impl RecordStore {
    /// Build a store from caller-supplied records.
    #[must_use]
    pub fn new(records: Vec<ObservationRecord>) -> Self {
        Self::from_records(records, DataSource::InMemory)
    }

    /// Build a store, recording its provenance.
    #[must_use]
    pub fn from_records(records: Vec<ObservationRecord>, source: DataSource) -> Self {
        let areas = sorted_unique(records.iter().map(|r| r.area.as_str()));
        let crops = sorted_unique(records.iter().map(|r| r.crop.as_str()));
        Self {
            records,
            areas,
            crops,
            source,
        }
    }

    /// Store with no records. Every prediction over it yields the fallback estimate.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Load `path`, or fall back to the synthetic demo dataset when the file
    /// is unreadable, malformed at the header level, or yields no records.
    ///
    /// Never fails: the worst case is a demo-quality store.
    #[must_use]
    pub fn load_or_synthesize(path: &Path, defaults: &FieldDefaults, seed: u64) -> Self {
        match load_csv_path(path, defaults) {
            Ok(report) if !report.store.is_empty() => report.store,
            Ok(report) => {
                warn!(
                    path = %path.display(),
                    rows_skipped = report.rows_skipped,
                    "historical data produced no records, using synthetic dataset"
                );
                Self::synthetic(seed)
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "historical data unavailable, using synthetic dataset"
                );
                Self::synthetic(seed)
            }
        }
    }

    /// The deterministic demo dataset for `seed`.
    #[must_use]
    pub fn synthetic(seed: u64) -> Self {
        let store = Self::from_records(demo_records(seed), DataSource::Synthetic { seed });
        info!(
            record_count = store.len(),
            areas = store.areas.len(),
            crops = store.crops.len(),
            "generated synthetic dataset"
        );
        store
    }

    /// All records, in load order.
    #[must_use]
    pub fn records(&self) -> &[ObservationRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ObservationRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, de-duplicated area labels.
    #[must_use]
    pub fn all_areas(&self) -> &[String] {
        &self.areas
    }

    /// Sorted, de-duplicated crop labels.
    #[must_use]
    pub fn all_crops(&self) -> &[String] {
        &self.crops
    }

    #[must_use]
    pub fn contains_area(&self, area: &str) -> bool {
        self.areas
            .binary_search_by(|probe| probe.as_str().cmp(area))
            .is_ok()
    }

    #[must_use]
    pub fn contains_crop(&self, crop: &str) -> bool {
        self.crops
            .binary_search_by(|probe| probe.as_str().cmp(crop))
            .is_ok()
    }

    #[must_use]
    pub const fn source(&self) -> &DataSource {
        &self.source
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a ObservationRecord;
    type IntoIter = std::slice::Iter<'a, ObservationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn sorted_unique<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    labels
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
