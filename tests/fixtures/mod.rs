//! Test fixtures and store doubles for integration testing

use smartrank::error::{RatingError, Result};
use smartrank::rating::{
    InMemoryRatingStore, MatchPointCalculator, RatingEngine, RatingEntry, RatingStore,
};
use smartrank::{MatchRecord, PlayerId, Rating};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Store that serves reads from memory but refuses every write
#[derive(Debug, Default)]
pub struct ReadOnlyRatingStore {
    inner: InMemoryRatingStore,
    rejected_writes: AtomicUsize,
}

impl ReadOnlyRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejected_writes(&self) -> usize {
        self.rejected_writes.load(Ordering::SeqCst)
    }

    fn reject(&self) -> Result<()> {
        self.rejected_writes.fetch_add(1, Ordering::SeqCst);
        Err(RatingError::InternalError {
            message: "store is read-only".to_string(),
        }
        .into())
    }
}

impl RatingStore for ReadOnlyRatingStore {
    fn default_rating(&self) -> Rating {
        self.inner.default_rating()
    }

    fn get_entry(&self, player_id: &PlayerId) -> Result<Option<RatingEntry>> {
        self.inner.get_entry(player_id)
    }

    fn store_rating(&self, _entry: RatingEntry) -> Result<()> {
        self.reject()
    }

    fn store_ratings(&self, _entries: Vec<RatingEntry>) -> Result<()> {
        self.reject()
    }

    fn get_all_ratings(&self) -> Result<HashMap<PlayerId, RatingEntry>> {
        self.inner.get_all_ratings()
    }

    fn get_player_count(&self) -> Result<usize> {
        self.inner.get_player_count()
    }
}

/// Calculator with default parameters over a shared in-memory store
pub fn create_test_calculator() -> (MatchPointCalculator, Arc<InMemoryRatingStore>) {
    let engine = RatingEngine::default();
    let store = Arc::new(InMemoryRatingStore::new(engine.default_rating()));
    let calculator = MatchPointCalculator::new(
        engine,
        smartrank::config::AdjustmentConfig::default(),
        store.clone(),
    )
    .expect("default adjustments are valid");
    (calculator, store)
}

/// Seed `player_id` with a fixed rating
pub fn seed(store: &InMemoryRatingStore, player_id: &str, mean: f64, deviation: f64) {
    store
        .store_rating(RatingEntry::new(
            player_id.to_string(),
            Rating::new(mean, deviation, 0.06),
        ))
        .expect("in-memory store accepts writes");
}

/// A short season between four competitors
pub fn sample_season() -> Vec<MatchRecord> {
    vec![
        MatchRecord::new("lin", "lee", "lin", "Round of 32", 3),
        MatchRecord::new("axelsen", "momota", "momota", "Round of 32", 3),
        MatchRecord::new("lin", "momota", "momota", "Quarter final", 2),
        MatchRecord::new("lee", "axelsen", "lee", "Quarter final", 2).with_retired("axelsen"),
        MatchRecord::new("momota", "lee", "momota", "Semi final", 1),
        MatchRecord::new("lin", "axelsen", "lin", "Semi final", 1).with_walkover("axelsen"),
        MatchRecord::new("momota", "lin", "lin", "Final", 1),
    ]
}
