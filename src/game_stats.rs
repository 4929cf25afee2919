use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::parse::{de_count, de_minutes, de_opt_text, de_text};

/// Raw counting stats from one box-score row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxScore {
    #[serde(default, deserialize_with = "de_count")]
    pub points: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub field_goals: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub field_goal_attempts: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub free_throws: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub free_throw_attempts: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub three_point_field_goals: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub three_point_field_goal_attempts: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub rebounds: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub assists: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub steals: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub blocks: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub turnovers: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub personal_fouls: u32,
}

/// One player's line for one game (late-game split as scraped).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStatLine {
    #[serde(default, deserialize_with = "de_text")]
    pub player_name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub team: String,
    #[serde(flatten)]
    pub stats: BoxScore,
    /// Fractional minutes; `None` when the clock field was absent or malformed.
    #[serde(default, deserialize_with = "de_minutes")]
    pub minutes: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub quarter: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub match_date: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub source_url: Option<String>,
}

impl GameStatLine {
    pub fn new(player_name: impl Into<String>, team: impl Into<String>, stats: BoxScore) -> Self {
        Self {
            player_name: player_name.into(),
            team: team.into(),
            stats,
            ..Self::default()
        }
    }
}

/// Share of `made` over `attempts` as a fraction, 0 when nothing was attempted.
pub fn ratio(made: u32, attempts: u32) -> f64 {
    if attempts > 0 {
        f64::from(made) / f64::from(attempts)
    } else {
        0.0
    }
}

impl BoxScore {
    pub fn field_goal_ratio(&self) -> f64 {
        ratio(self.field_goals, self.field_goal_attempts)
    }

    pub fn free_throw_ratio(&self) -> f64 {
        ratio(self.free_throws, self.free_throw_attempts)
    }

    pub fn three_point_ratio(&self) -> f64 {
        ratio(self.three_point_field_goals, self.three_point_field_goal_attempts)
    }
}

/// Decodes a game-line snapshot (a JSON array of rows). Rows that are not
/// objects, or have no player name to group by, are dropped.
pub fn parse_game_lines_json(raw: &str) -> Result<Vec<GameStatLine>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<Value> = serde_json::from_str(trimmed).context("invalid game lines json")?;
    let total = rows.len();
    let lines: Vec<GameStatLine> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value::<GameStatLine>(row).ok())
        .filter(|line| !line.player_name.trim().is_empty())
        .collect();
    if lines.len() < total {
        debug!(dropped = total - lines.len(), "unusable game lines");
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_numbers_are_typed() {
        let raw = r#"[{"player_name":"A","team":"BOS","points":"12","field_goals":"5",
            "field_goal_attempts":"9","minutes":"7:30","rebounds":3}]"#;
        let lines = parse_game_lines_json(raw).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].stats.points, 12);
        assert_eq!(lines[0].stats.field_goal_attempts, 9);
        assert_eq!(lines[0].stats.rebounds, 3);
        assert_eq!(lines[0].minutes, Some(7.5));
    }

    #[test]
    fn malformed_fields_default() {
        let raw = r#"[{"player_name":"A","points":"n/a","minutes":"DNP","assists":null}]"#;
        let lines = parse_game_lines_json(raw).unwrap();
        assert_eq!(lines[0].stats.points, 0);
        assert_eq!(lines[0].stats.assists, 0);
        assert_eq!(lines[0].minutes, None);
        assert_eq!(lines[0].team, "");
    }

    #[test]
    fn ratios_guard_zero_attempts() {
        let stats = BoxScore::default();
        assert_eq!(stats.field_goal_ratio(), 0.0);
        assert_eq!(stats.free_throw_ratio(), 0.0);
        assert_eq!(stats.three_point_ratio(), 0.0);
    }

    #[test]
    fn nameless_rows_dropped() {
        let raw = r#"[{"points":"4"},{"player_name":"B","points":"2"}]"#;
        let lines = parse_game_lines_json(raw).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].player_name, "B");
    }

    #[test]
    fn non_object_rows_skipped() {
        let raw = r#"[{"player_name":"A","points":"4"}, null, 7, "B", []]"#;
        let lines = parse_game_lines_json(raw).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].player_name, "A");
        assert_eq!(lines[0].stats.points, 4);
        assert!(parse_game_lines_json(r#"{"player_name":"A"}"#).is_err());
    }
}
