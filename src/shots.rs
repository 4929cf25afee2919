use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::parse::{de_clock, de_count, de_flag, de_float, de_opt_text, de_text};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShotType {
    TwoPointer,
    ThreePointer,
    Other(String),
}

impl ShotType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "2-pointer" => ShotType::TwoPointer,
            "3-pointer" => ShotType::ThreePointer,
            other => ShotType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ShotType::TwoPointer => "2-pointer",
            ShotType::ThreePointer => "3-pointer",
            ShotType::Other(raw) => raw,
        }
    }
}

impl Default for ShotType {
    fn default() -> Self {
        ShotType::Other(String::new())
    }
}

impl fmt::Display for ShotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ShotType {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ShotType {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(ShotType::parse(&de_text(d)?))
    }
}

/// One attempted shot, typed at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotEvent {
    #[serde(default, deserialize_with = "de_text")]
    pub player_id: String,
    #[serde(default, deserialize_with = "de_text")]
    pub player_name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub season: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub source_url: Option<String>,
    #[serde(rename = "x_coordinate", default, deserialize_with = "de_float")]
    pub x: f64,
    #[serde(rename = "y_coordinate", default, deserialize_with = "de_float")]
    pub y: f64,
    #[serde(rename = "is_made", default, deserialize_with = "de_flag")]
    pub made: bool,
    #[serde(default, deserialize_with = "de_text")]
    pub game_date: String,
    /// `"<season year>, <TEAM> ..."` as scraped.
    #[serde(default, deserialize_with = "de_text")]
    pub teams: String,
    #[serde(default, deserialize_with = "de_text")]
    pub quarter: String,
    /// Seconds left on the game clock; `None` when the clock could not be read.
    #[serde(rename = "time_remaining", default, deserialize_with = "de_clock")]
    pub seconds_remaining: Option<u32>,
    #[serde(default)]
    pub shot_type: ShotType,
    /// Feet from the basket; 0 when unreadable.
    #[serde(rename = "shot_distance", default, deserialize_with = "de_count")]
    pub distance_ft: u32,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub score_description: Option<String>,
}

const NAME_SUFFIX: &str = " Overview";

impl ShotEvent {
    /// Player name without the page-title suffix the scraper leaves behind.
    pub fn display_name(&self) -> &str {
        self.player_name
            .strip_suffix(NAME_SUFFIX)
            .unwrap_or(&self.player_name)
            .trim()
    }

    /// Shooter's team: leading word of the second comma-separated token of `teams`.
    pub fn team_code(&self) -> &str {
        self.teams
            .split(',')
            .nth(1)
            .and_then(|t| t.split_whitespace().next())
            .unwrap_or_default()
    }

    /// Season year: first comma-separated token of `teams`.
    pub fn season_year(&self) -> &str {
        self.teams.split(',').next().unwrap_or_default().trim()
    }
}

fn decode_rows(rows: Vec<Value>, out: &mut Vec<ShotEvent>) {
    let total = rows.len();
    out.reserve(total);
    let mut skipped = 0usize;
    for row in rows {
        match serde_json::from_value::<ShotEvent>(row) {
            Ok(shot) => out.push(shot),
            Err(_) => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, total, "undecodable shot rows");
    }
}

/// Decodes a per-team or per-player shot resource (a JSON array of shots).
pub fn parse_shots_json(raw: &str) -> Result<Vec<ShotEvent>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<Value> = serde_json::from_str(trimmed).context("invalid shots json")?;
    let mut out = Vec::new();
    decode_rows(rows, &mut out);
    Ok(out)
}

/// Decodes the combined season resource, `{ "<TEAM>": { "shots": [...] }, ... }`,
/// into one flat list in file order.
pub fn parse_combined_shots_json(raw: &str) -> Result<Vec<ShotEvent>> {
    let v: Value = serde_json::from_str(raw.trim()).context("invalid combined shots json")?;
    let Value::Object(teams) = v else {
        return Err(anyhow::anyhow!("combined shots json is not an object"));
    };
    let mut out = Vec::new();
    for (team, mut entry) in teams {
        let Some(Value::Array(rows)) = entry.get_mut("shots").map(Value::take) else {
            debug!(team = %team, "combined entry without shots array");
            continue;
        };
        decode_rows(rows, &mut out);
    }
    Ok(out)
}
