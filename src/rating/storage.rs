//! Rating storage interface and implementations
//!
//! This module defines the interface the match point calculator uses to look
//! up and commit competitor ratings, with an in-memory implementation and a
//! recording double for tests.

use crate::error::RatingError;
use crate::rating::model::Rating;
use crate::types::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Storage entry for a competitor's rating with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingEntry {
    pub player_id: PlayerId,
    pub rating: Rating,
    pub matches_played: u64,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RatingEntry {
    /// Create a new rating entry for a competitor with no rated matches
    pub fn new(player_id: PlayerId, initial_rating: Rating) -> Self {
        let now = Utc::now();
        Self {
            player_id,
            rating: initial_rating,
            matches_played: 0,
            last_updated: now,
            created_at: now,
        }
    }

    /// Update the rating and increment matches played
    pub fn update_rating(&mut self, new_rating: Rating) {
        self.rating = new_rating;
        self.matches_played += 1;
        self.last_updated = Utc::now();
    }
}

/// Trait for rating storage operations
pub trait RatingStore: Send + Sync {
    /// Rating reported for competitors without an entry
    fn default_rating(&self) -> Rating;

    /// Get a competitor's rating entry, if one was ever committed
    fn get_entry(&self, player_id: &PlayerId) -> crate::error::Result<Option<RatingEntry>>;

    /// Store or replace a competitor's rating entry
    fn store_rating(&self, entry: RatingEntry) -> crate::error::Result<()>;

    /// Store several entries in one write
    fn store_ratings(&self, entries: Vec<RatingEntry>) -> crate::error::Result<()>;

    /// Get all competitors with ratings
    fn get_all_ratings(&self) -> crate::error::Result<HashMap<PlayerId, RatingEntry>>;

    /// Get total number of rated competitors
    fn get_player_count(&self) -> crate::error::Result<usize>;

    /// Current rating of a competitor, or the default rating for unknown ids.
    ///
    /// Reads never insert, so repeated lookups of an unseen id agree.
    fn get_rating(&self, player_id: &PlayerId) -> crate::error::Result<Rating> {
        Ok(self
            .get_entry(player_id)?
            .map(|entry| entry.rating)
            .unwrap_or_else(|| self.default_rating()))
    }
}

fn read_guard<T>(lock: &RwLock<T>) -> crate::error::Result<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| {
        RatingError::InternalError {
            message: "Failed to acquire ratings read lock".to_string(),
        }
        .into()
    })
}

fn write_guard<T>(lock: &RwLock<T>) -> crate::error::Result<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| {
        RatingError::InternalError {
            message: "Failed to acquire ratings write lock".to_string(),
        }
        .into()
    })
}

/// In-memory rating storage implementation
#[derive(Debug)]
pub struct InMemoryRatingStore {
    ratings: RwLock<HashMap<PlayerId, RatingEntry>>,
    default_rating: Rating,
}

impl InMemoryRatingStore {
    /// Create an empty store handing out `default_rating` for unknown ids
    pub fn new(default_rating: Rating) -> Self {
        Self {
            ratings: RwLock::new(HashMap::new()),
            default_rating,
        }
    }
}

impl Default for InMemoryRatingStore {
    fn default() -> Self {
        Self::new(crate::rating::engine::RatingEngine::default().default_rating())
    }
}

impl RatingStore for InMemoryRatingStore {
    fn default_rating(&self) -> Rating {
        self.default_rating
    }

    fn get_entry(&self, player_id: &PlayerId) -> crate::error::Result<Option<RatingEntry>> {
        let ratings = read_guard(&self.ratings)?;
        Ok(ratings.get(player_id).cloned())
    }

    fn store_rating(&self, entry: RatingEntry) -> crate::error::Result<()> {
        let mut ratings = write_guard(&self.ratings)?;
        ratings.insert(entry.player_id.clone(), entry);
        Ok(())
    }

    fn store_ratings(&self, entries: Vec<RatingEntry>) -> crate::error::Result<()> {
        let mut ratings = write_guard(&self.ratings)?;
        for entry in entries {
            ratings.insert(entry.player_id.clone(), entry);
        }
        Ok(())
    }

    fn get_all_ratings(&self) -> crate::error::Result<HashMap<PlayerId, RatingEntry>> {
        let ratings = read_guard(&self.ratings)?;
        Ok(ratings.clone())
    }

    fn get_player_count(&self) -> crate::error::Result<usize> {
        let ratings = read_guard(&self.ratings)?;
        Ok(ratings.len())
    }
}

/// Mock rating storage for testing
#[derive(Debug)]
pub struct MockRatingStore {
    inner: InMemoryRatingStore,
    store_calls: RwLock<Vec<RatingEntry>>,
}

impl MockRatingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryRatingStore::default(),
            store_calls: RwLock::new(Vec::new()),
        }
    }

    /// Get all entries passed to store calls (for testing)
    pub fn get_store_calls(&self) -> Vec<RatingEntry> {
        self.store_calls
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Clear store calls (for testing)
    pub fn clear_store_calls(&self) {
        if let Ok(mut calls) = self.store_calls.write() {
            calls.clear();
        }
    }

    /// Preset ratings without recording a store call
    pub fn preset_rating(&self, player_id: &str, rating: Rating) -> crate::error::Result<()> {
        self.inner
            .store_rating(RatingEntry::new(player_id.to_string(), rating))
    }

    fn record(&self, entries: &[RatingEntry]) {
        if let Ok(mut calls) = self.store_calls.write() {
            calls.extend_from_slice(entries);
        }
    }
}

impl Default for MockRatingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingStore for MockRatingStore {
    fn default_rating(&self) -> Rating {
        self.inner.default_rating()
    }

    fn get_entry(&self, player_id: &PlayerId) -> crate::error::Result<Option<RatingEntry>> {
        self.inner.get_entry(player_id)
    }

    fn store_rating(&self, entry: RatingEntry) -> crate::error::Result<()> {
        self.record(std::slice::from_ref(&entry));
        self.inner.store_rating(entry)
    }

    fn store_ratings(&self, entries: Vec<RatingEntry>) -> crate::error::Result<()> {
        self.record(&entries);
        self.inner.store_ratings(entries)
    }

    fn get_all_ratings(&self) -> crate::error::Result<HashMap<PlayerId, RatingEntry>> {
        self.inner.get_all_ratings()
    }

    fn get_player_count(&self) -> crate::error::Result<usize> {
        self.inner.get_player_count()
    }
}
