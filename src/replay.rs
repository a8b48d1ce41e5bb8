//! Replay of a match history through the calculator
//!
//! Reads match records, rates them one at a time in file order and keeps the
//! rating each competitor held after every match, which is what rating
//! trajectory charts are drawn from.

use crate::error::RatingError;
use crate::rating::calculator::MatchPointCalculator;
use crate::types::{MatchRecord, PlayerId};
use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Read;
use tracing::info;

/// A match record together with both competitors' means after it was rated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedMatch {
    #[serde(flatten)]
    pub record: MatchRecord,
    pub player1_elo_after: f64,
    pub player2_elo_after: f64,
}

impl RatedMatch {
    /// Mean of `player_id` after this match, if they played in it
    pub fn mean_after(&self, player_id: &str) -> Option<f64> {
        if self.record.player1_id == player_id {
            Some(self.player1_elo_after)
        } else if self.record.player2_id == player_id {
            Some(self.player2_elo_after)
        } else {
            None
        }
    }
}

/// One point of a competitor's rating trajectory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryPoint {
    /// Position of the match in the replayed history
    pub match_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub mean: f64,
}

/// Read match records from JSON lines, or from a single JSON array.
///
/// Blank lines are skipped. A malformed record fails the whole read with its
/// line number.
pub fn read_match_records<R: Read>(mut reader: R) -> crate::error::Result<Vec<MatchRecord>> {
    let mut contents = String::new();
    reader
        .read_to_string(&mut contents)
        .context("Failed to read match records")?;

    if contents.trim_start().starts_with('[') {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(&contents).map_err(|e| RatingError::InvalidMatchRecord {
                reason: e.to_string(),
            })?;
        return values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                MatchRecord::from_json(value).with_context(|| format!("record {}", index + 1))
            })
            .collect();
    }

    let mut records = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let value: serde_json::Value =
            serde_json::from_str(line).map_err(|e| RatingError::InvalidMatchRecord {
                reason: format!("line {}: {}", index + 1, e),
            })?;
        let record =
            MatchRecord::from_json(value).with_context(|| format!("line {}", index + 1))?;
        records.push(record);
    }

    Ok(records)
}

/// Rate `records` in order, stopping at the first match that fails.
pub fn replay_matches(
    calculator: &MatchPointCalculator,
    records: &[MatchRecord],
) -> crate::error::Result<Vec<RatedMatch>> {
    let mut rated = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let points = calculator.calculate_points(record).with_context(|| {
            format!(
                "Failed to rate match {} ({} vs {})",
                index + 1,
                record.player1_id,
                record.player2_id
            )
        })?;
        let (player1_elo_after, player2_elo_after) = points.means();

        rated.push(RatedMatch {
            record: record.clone(),
            player1_elo_after,
            player2_elo_after,
        });
    }

    info!(
        "Replayed {} matches, {} competitors rated",
        rated.len(),
        calculator.store().get_player_count()?
    );

    Ok(rated)
}

/// Means of `player_id` after each of their matches, ordered by match date.
///
/// Matches on the same day, or without a date, keep their replay order.
/// Undated matches come before dated ones.
pub fn rating_trajectory(rated: &[RatedMatch], player_id: &PlayerId) -> Vec<TrajectoryPoint> {
    let mut points: Vec<TrajectoryPoint> = rated
        .iter()
        .enumerate()
        .filter_map(|(match_index, rated_match)| {
            rated_match
                .mean_after(player_id)
                .map(|mean| TrajectoryPoint {
                    match_index,
                    date: rated_match.record.date,
                    mean,
                })
        })
        .collect();

    points.sort_by_key(|point| (point.date, point.match_index));
    points
}
