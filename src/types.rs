//! Common types used throughout the rating engine

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Unique identifier for competitors
pub type PlayerId = String;

/// A completed singles match, as supplied by the match history table.
///
/// Field names follow the camelCase wire form; the PascalCase column names of
/// the tabular export are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(alias = "Player1Id", deserialize_with = "player_id")]
    pub player1_id: PlayerId,
    #[serde(alias = "Player2Id", deserialize_with = "player_id")]
    pub player2_id: PlayerId,
    #[serde(alias = "WinnerId", deserialize_with = "player_id")]
    pub winner_id: PlayerId,
    #[serde(alias = "Round")]
    pub round: String,
    #[serde(alias = "Grade")]
    pub grade: i64,
    #[serde(
        alias = "RetiredId",
        default,
        deserialize_with = "optional_player_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub retired_id: Option<PlayerId>,
    #[serde(
        alias = "WalkoverId",
        default,
        deserialize_with = "optional_player_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub walkover_id: Option<PlayerId>,
    /// Day the match was played, used to order rating trajectories
    #[serde(alias = "Date", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl MatchRecord {
    /// Create a plain completed match with no retirement or walkover
    pub fn new(
        player1_id: impl Into<PlayerId>,
        player2_id: impl Into<PlayerId>,
        winner_id: impl Into<PlayerId>,
        round: impl Into<String>,
        grade: i64,
    ) -> Self {
        Self {
            player1_id: player1_id.into(),
            player2_id: player2_id.into(),
            winner_id: winner_id.into(),
            round: round.into(),
            grade,
            retired_id: None,
            walkover_id: None,
            date: None,
        }
    }

    /// Parse a match record from a JSON value, reporting missing or mistyped
    /// fields as an invalid match record
    pub fn from_json(value: serde_json::Value) -> crate::error::Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            crate::error::RatingError::InvalidMatchRecord {
                reason: e.to_string(),
            }
            .into()
        })
    }

    pub fn with_retired(mut self, player_id: impl Into<PlayerId>) -> Self {
        self.retired_id = Some(player_id.into());
        self
    }

    pub fn with_walkover(mut self, player_id: impl Into<PlayerId>) -> Self {
        self.walkover_id = Some(player_id.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Ids in exported tables are sometimes numeric; both forms compare as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPlayerId {
    Text(String),
    Number(i64),
}

impl From<RawPlayerId> for PlayerId {
    fn from(raw: RawPlayerId) -> Self {
        match raw {
            RawPlayerId::Text(text) => text,
            RawPlayerId::Number(number) => number.to_string(),
        }
    }
}

fn player_id<'de, D>(deserializer: D) -> std::result::Result<PlayerId, D::Error>
where
    D: Deserializer<'de>,
{
    RawPlayerId::deserialize(deserializer).map(PlayerId::from)
}

fn optional_player_id<'de, D>(deserializer: D) -> std::result::Result<Option<PlayerId>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawPlayerId>::deserialize(deserializer).map(|raw| raw.map(PlayerId::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RatingError;
    use serde_json::json;

    #[test]
    fn test_match_record_camel_case() {
        let record = MatchRecord::from_json(json!({
            "player1Id": "a",
            "player2Id": "b",
            "winnerId": "a",
            "round": "Final",
            "grade": 1,
            "retiredId": null,
            "walkoverId": "b"
        }))
        .unwrap();

        assert_eq!(record.player1_id, "a");
        assert_eq!(record.winner_id, "a");
        assert_eq!(record.round, "Final");
        assert_eq!(record.grade, 1);
        assert_eq!(record.retired_id, None);
        assert_eq!(record.walkover_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_match_record_tabular_columns_and_numeric_ids() {
        let record = MatchRecord::from_json(json!({
            "Player1Id": 101,
            "Player2Id": 202,
            "WinnerId": 202,
            "Round": "Round 1",
            "Grade": 3,
            "RetiredId": 101,
            "Date": "2023-05-14"
        }))
        .unwrap();

        assert_eq!(record.player1_id, "101");
        assert_eq!(record.player2_id, "202");
        assert_eq!(record.winner_id, "202");
        assert_eq!(record.retired_id.as_deref(), Some("101"));
        assert_eq!(record.walkover_id, None);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 5, 14));
    }

    #[test]
    fn test_missing_field_is_invalid_record() {
        let result = MatchRecord::from_json(json!({
            "player1Id": "a",
            "player2Id": "b",
            "round": "Final",
            "grade": 1
        }));

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::InvalidMatchRecord { .. })
        ));
        assert!(err.to_string().contains("winnerId"));
    }

    #[test]
    fn test_omitted_forfeit_columns_mean_no_forfeit() {
        let record = MatchRecord::from_json(json!({
            "player1Id": "a",
            "player2Id": "b",
            "winnerId": "b",
            "round": "Round 1",
            "grade": 3
        }))
        .unwrap();

        assert_eq!(record.retired_id, None);
        assert_eq!(record.walkover_id, None);
        assert_eq!(record.date, None);
    }

    #[test]
    fn test_builder_helpers() {
        let record = MatchRecord::new("a", "b", "b", "Semi final", 2)
            .with_retired("a")
            .with_date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        assert_eq!(record.retired_id.as_deref(), Some("a"));
        assert_eq!(record.walkover_id, None);
        assert!(record.date.is_some());
    }
}
