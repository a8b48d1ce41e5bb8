//! Badminton-specific adjustments layered on the statistical update
//!
//! Each step is a pure function over [`MatchDeltas`] or [`Rating`]. The match
//! point calculator threads values through them in a fixed order: outsider
//! bonus, grade weighting, round bonus, delta application, penalties.

use crate::config::rating::AdjustmentConfig;
use crate::rating::model::Rating;
use serde::{Deserialize, Serialize};

/// Which side of a match a competitor played on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player1,
    Player2,
}

/// Rating changes of both players in one match
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchDeltas {
    pub player1: f64,
    pub player2: f64,
}

impl MatchDeltas {
    pub fn new(player1: f64, player2: f64) -> Self {
        Self { player1, player2 }
    }

    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Player1 => self.player1,
            Side::Player2 => self.player2,
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            player1: f(self.player1),
            player2: f(self.player2),
        }
    }
}

/// Tournament grade of the event a match belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventGrade {
    Grade1,
    Grade2,
    Grade3,
    Unclassified,
}

impl EventGrade {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => EventGrade::Grade1,
            2 => EventGrade::Grade2,
            3 => EventGrade::Grade3,
            _ => EventGrade::Unclassified,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            EventGrade::Grade1 => 1.5,
            EventGrade::Grade2 => 1.2,
            EventGrade::Grade3 | EventGrade::Unclassified => 1.0,
        }
    }
}

/// Stage of the draw at which a match was played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundStage {
    QuarterFinal,
    SemiFinal,
    Final,
    Other,
}

impl RoundStage {
    /// Labels are matched exactly, as they appear in the match history
    pub fn from_label(label: &str) -> Self {
        match label {
            "Quarter final" => RoundStage::QuarterFinal,
            "Semi final" => RoundStage::SemiFinal,
            "Final" => RoundStage::Final,
            _ => RoundStage::Other,
        }
    }

    pub fn bonus(self) -> f64 {
        match self {
            RoundStage::QuarterFinal => 0.15,
            RoundStage::SemiFinal => 0.25,
            RoundStage::Final => 0.35,
            RoundStage::Other => 0.0,
        }
    }
}

/// Why a competitor did not finish a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Forfeit {
    Retired,
    Walkover,
}

impl Forfeit {
    pub fn penalty(self, config: &AdjustmentConfig) -> f64 {
        match self {
            Forfeit::Retired => config.retirement_penalty,
            Forfeit::Walkover => config.walkover_penalty,
        }
    }
}

/// Extra credit for a winner whose pre-match mean was far from the loser's.
///
/// Only the winner's delta changes. `winner` is `None` when the match named a
/// winner that played on neither side.
pub fn apply_outsider_bonus(
    deltas: MatchDeltas,
    player1: &Rating,
    player2: &Rating,
    winner: Option<Side>,
    config: &AdjustmentConfig,
) -> MatchDeltas {
    if (player1.mean - player2.mean).abs() <= config.outsider_gap_threshold {
        return deltas;
    }

    let bonus = |delta: f64| delta + delta * config.outsider_bonus;
    match winner {
        Some(Side::Player1) => MatchDeltas {
            player1: bonus(deltas.player1),
            ..deltas
        },
        Some(Side::Player2) => MatchDeltas {
            player2: bonus(deltas.player2),
            ..deltas
        },
        None => deltas,
    }
}

pub fn apply_grade_weighting(deltas: MatchDeltas, grade: EventGrade) -> MatchDeltas {
    let multiplier = grade.multiplier();
    deltas.map(|delta| delta * multiplier)
}

pub fn apply_round_bonus(deltas: MatchDeltas, round: RoundStage) -> MatchDeltas {
    let bonus = round.bonus();
    deltas.map(|delta| delta + delta * bonus)
}

/// Retirement takes precedence over a walkover for the same competitor
pub fn forfeit_for(
    player_id: &str,
    retired_id: Option<&str>,
    walkover_id: Option<&str>,
) -> Option<Forfeit> {
    if retired_id == Some(player_id) {
        Some(Forfeit::Retired)
    } else if walkover_id == Some(player_id) {
        Some(Forfeit::Walkover)
    } else {
        None
    }
}

pub fn apply_penalty(rating: Rating, forfeit: Option<Forfeit>, config: &AdjustmentConfig) -> Rating {
    match forfeit {
        Some(forfeit) => rating.shifted(-forfeit.penalty(config)),
        None => rating,
    }
}
