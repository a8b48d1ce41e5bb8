//! Match point calculator
//!
//! Turns a completed match record into two committed ratings: looks up both
//! competitors, runs the one-on-one Glicko-2 update, threads the resulting
//! deltas through the adjustment pipeline and commits both ratings in a single
//! store write.

use crate::config::rating::AdjustmentConfig;
use crate::error::RatingError;
use crate::rating::adjustments::{
    apply_grade_weighting, apply_outsider_bonus, apply_penalty, apply_round_bonus, forfeit_for,
    EventGrade, Forfeit, MatchDeltas, RoundStage, Side,
};
use crate::rating::engine::RatingEngine;
use crate::rating::model::Rating;
use crate::rating::storage::{RatingEntry, RatingStore};
use crate::types::MatchRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Deltas and ratings at each stage of the adjustment pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsBreakdown {
    /// Ratings before the match
    pub previous: (Rating, Rating),
    /// Deltas straight from the statistical update
    pub base: MatchDeltas,
    pub after_outsider_bonus: MatchDeltas,
    pub after_grade: MatchDeltas,
    /// Final deltas, added on top of the updated means
    pub after_round: MatchDeltas,
    /// Ratings with bonuses applied, before penalties
    pub bonus_adjusted: (Rating, Rating),
    pub forfeits: (Option<Forfeit>, Option<Forfeit>),
}

/// Outcome of rating one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPoints {
    pub player1: Rating,
    pub player2: Rating,
    pub breakdown: PointsBreakdown,
}

impl MatchPoints {
    /// New means of player 1 and player 2
    pub fn means(&self) -> (f64, f64) {
        (self.player1.mean, self.player2.mean)
    }
}

pub struct MatchPointCalculator {
    engine: RatingEngine,
    adjustments: AdjustmentConfig,
    store: Arc<dyn RatingStore>,
}

impl MatchPointCalculator {
    /// Create a calculator committing into `store`.
    ///
    /// The store must hand out the engine's default rating for unseen ids.
    pub fn new(
        engine: RatingEngine,
        adjustments: AdjustmentConfig,
        store: Arc<dyn RatingStore>,
    ) -> crate::error::Result<Self> {
        adjustments.validate()?;

        if store.default_rating() != engine.default_rating() {
            return Err(RatingError::ConfigurationError {
                message: format!(
                    "Store default {} does not match engine default {}",
                    store.default_rating(),
                    engine.default_rating()
                ),
            }
            .into());
        }

        Ok(Self {
            engine,
            adjustments,
            store,
        })
    }

    /// Calculator with default parameters and a fresh in-memory store
    pub fn with_defaults() -> Self {
        let engine = RatingEngine::default();
        let store = Arc::new(crate::rating::storage::InMemoryRatingStore::new(
            engine.default_rating(),
        ));

        Self {
            engine,
            adjustments: AdjustmentConfig::default(),
            store,
        }
    }

    pub fn engine(&self) -> &RatingEngine {
        &self.engine
    }

    pub fn adjustments(&self) -> &AdjustmentConfig {
        &self.adjustments
    }

    pub fn store(&self) -> &Arc<dyn RatingStore> {
        &self.store
    }

    /// Rate one match and commit both competitors' new ratings.
    ///
    /// Nothing is written to the store when any step fails.
    pub fn calculate_points(&self, record: &MatchRecord) -> crate::error::Result<MatchPoints> {
        let mut entry1 = self.lookup(&record.player1_id)?;
        let mut entry2 = self.lookup(&record.player2_id)?;
        let previous1 = entry1.rating;
        let previous2 = entry2.rating;

        let winner = if record.winner_id == record.player1_id {
            Some(Side::Player1)
        } else if record.winner_id == record.player2_id {
            Some(Side::Player2)
        } else {
            warn!(
                "Winner '{}' played on neither side of {} vs {}; rating as a player 2 win",
                record.winner_id, record.player1_id, record.player2_id
            );
            None
        };

        let update = self
            .engine
            .rate_1v1(&previous1, &previous2, winner == Some(Side::Player1))?;
        let base = MatchDeltas::new(update.delta1, update.delta2);

        let grade = EventGrade::from_code(record.grade);
        let round = RoundStage::from_label(&record.round);

        let after_outsider_bonus =
            apply_outsider_bonus(base, &previous1, &previous2, winner, &self.adjustments);
        let after_grade = apply_grade_weighting(after_outsider_bonus, grade);
        let after_round = apply_round_bonus(after_grade, round);

        let bonus_adjusted1 = update.player1.shifted(after_round.player1);
        let bonus_adjusted2 = update.player2.shifted(after_round.player2);

        let forfeit1 = forfeit_for(
            &record.player1_id,
            record.retired_id.as_deref(),
            record.walkover_id.as_deref(),
        );
        let forfeit2 = forfeit_for(
            &record.player2_id,
            record.retired_id.as_deref(),
            record.walkover_id.as_deref(),
        );

        let final1 = apply_penalty(bonus_adjusted1, forfeit1, &self.adjustments);
        let final2 = apply_penalty(bonus_adjusted2, forfeit2, &self.adjustments);

        debug!(
            player1 = %record.player1_id,
            player2 = %record.player2_id,
            ?grade,
            ?round,
            base1 = base.player1,
            base2 = base.player2,
            adjusted1 = after_round.player1,
            adjusted2 = after_round.player2,
            "Rated match"
        );

        entry1.update_rating(final1);
        entry2.update_rating(final2);
        self.store.store_ratings(vec![entry1, entry2])?;

        Ok(MatchPoints {
            player1: final1,
            player2: final2,
            breakdown: PointsBreakdown {
                previous: (previous1, previous2),
                base,
                after_outsider_bonus,
                after_grade,
                after_round,
                bonus_adjusted: (bonus_adjusted1, bonus_adjusted2),
                forfeits: (forfeit1, forfeit2),
            },
        })
    }

    fn lookup(&self, player_id: &str) -> crate::error::Result<RatingEntry> {
        let player_id = player_id.to_string();
        Ok(match self.store.get_entry(&player_id)? {
            Some(entry) => entry,
            None => RatingEntry::new(player_id, self.engine.default_rating()),
        })
    }
}

impl std::fmt::Debug for MatchPointCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchPointCalculator")
            .field("engine", &self.engine)
            .field("adjustments", &self.adjustments)
            .finish_non_exhaustive()
    }
}
