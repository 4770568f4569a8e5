//! Tiered candidate selection.
//!
//! Tiers are tried in order and the first non-empty one wins:
//!
//! 1. **Exact**: same area AND same crop, year within `year_window`.
//! 2. **Partial**: same area OR same crop, any year.
//! 3. **Fallback**: every record in the store.
//!
//! The partial tier is a union, so it can admit records that share only the
//! crop (or only the area) with the query, regardless of climate.

use tracing::{debug, instrument};
use yieldcast_core::{MatchTier, ObservationRecord, YieldQuery};
use yieldcast_store::RecordStore;

/// Records selected for one query, borrowed from the store.
#[derive(Debug, Clone)]
pub struct CandidateSet<'a> {
    tier: MatchTier,
    records: Vec<&'a ObservationRecord>,
}

impl<'a> CandidateSet<'a> {
    /// Build a set directly. Used by callers that select records themselves.
    #[must_use]
    pub const fn new(tier: MatchTier, records: Vec<&'a ObservationRecord>) -> Self {
        Self { tier, records }
    }

    #[must_use]
    pub const fn tier(&self) -> MatchTier {
        self.tier
    }

    #[must_use]
    pub fn records(&self) -> &[&'a ObservationRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ObservationRecord> + '_ {
        self.records.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Select candidates for `query`.
///
/// Non-empty whenever `store` is non-empty; an empty store produces
/// [`MatchTier::Empty`].
#[must_use]
#[instrument(
    name = "yieldcast::select",
    skip(store, query),
    fields(store_len = store.len(), area = %query.area, crop = %query.crop)
)]
pub fn select_candidates<'a>(
    store: &'a RecordStore,
    query: &YieldQuery,
    year_window: u32,
) -> CandidateSet<'a> {
    let exact: Vec<_> = store
        .iter()
        .filter(|r| r.same_area_and_crop(query) && r.year_distance(query) <= year_window)
        .collect();
    if !exact.is_empty() {
        return finish(MatchTier::Exact, exact);
    }

    let partial: Vec<_> = store
        .iter()
        .filter(|r| r.shares_area_or_crop(query))
        .collect();
    if !partial.is_empty() {
        return finish(MatchTier::Partial, partial);
    }

    if store.is_empty() {
        return finish(MatchTier::Empty, Vec::new());
    }
    finish(MatchTier::Fallback, store.iter().collect())
}

fn finish(tier: MatchTier, records: Vec<&ObservationRecord>) -> CandidateSet<'_> {
    debug!(
        target: "yieldcast::select",
        %tier,
        candidate_count = records.len(),
        "candidates selected"
    );
    CandidateSet::new(tier, records)
}
