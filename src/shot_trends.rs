use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::report::Report;
use crate::shot_classifier::{ShotStats, Tally};
use crate::shots::ShotEvent;

pub const MOVING_AVERAGE_WINDOW: usize = 3;
/// A trend line needs at least this many games.
pub const MIN_TREND_GAMES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameTrendPoint {
    /// Date label as scraped, e.g. `"Dec 28"`.
    pub game_date: String,
    pub date: Option<NaiveDate>,
    pub stats: ShotStats,
    /// Trailing average of the overall make percentage over this game and the
    /// two before it; `None` for the first two games.
    pub moving_average: Option<f64>,
}

/// Combines a `"Dec 28"` label with the season year. Labels that already carry
/// a year are accepted as they are.
pub fn parse_game_date(game_date: &str, year: &str) -> Option<NaiveDate> {
    let label = game_date.trim();
    let full = format!("{label}, {}", year.trim());
    ["%b %d, %Y", "%B %d, %Y"]
        .iter()
        .find_map(|fmt| {
            NaiveDate::parse_from_str(&full, fmt)
                .or_else(|_| NaiveDate::parse_from_str(label, fmt))
                .ok()
        })
}

/// Per-game shooting in chronological order with a 3-game moving average.
/// Games whose date cannot be read sort after the dated ones.
pub fn shooting_trend(shots: &[ShotEvent]) -> Report<Vec<GameTrendPoint>> {
    let mut games: Vec<(&str, Option<NaiveDate>, Tally)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for shot in shots {
        let key = shot.game_date.as_str();
        let idx = *index.entry(key).or_insert_with(|| {
            let date = parse_game_date(key, shot.season_year());
            games.push((key, date, Tally::default()));
            games.len() - 1
        });
        games[idx].2.add(shot);
    }

    if games.len() < MIN_TREND_GAMES {
        return Report::Insufficient;
    }

    games.sort_by_key(|(_, date, _)| (date.is_none(), *date));

    let mut points: Vec<GameTrendPoint> = games
        .into_iter()
        .map(|(game_date, date, tally)| GameTrendPoint {
            game_date: game_date.to_string(),
            date,
            stats: tally.stats(),
            moving_average: None,
        })
        .collect();

    for i in (MOVING_AVERAGE_WINDOW - 1)..points.len() {
        let window = &points[i + 1 - MOVING_AVERAGE_WINDOW..=i];
        let sum: f64 = window.iter().map(|p| p.stats.percentage).sum();
        points[i].moving_average = Some(sum / MOVING_AVERAGE_WINDOW as f64);
    }

    Report::Ready(points)
}
