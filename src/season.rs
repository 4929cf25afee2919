use std::collections::HashMap;

use serde::Serialize;

use crate::clutch_score::calculate_clutch_score;
use crate::game_stats::GameStatLine;

/// Running season totals for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SeasonTotals {
    pub points: u64,
    pub field_goals: u64,
    pub field_goal_attempts: u64,
    pub free_throws: u64,
    pub free_throw_attempts: u64,
    pub three_point_field_goals: u64,
    pub three_point_field_goal_attempts: u64,
    pub rebounds: u64,
    pub assists: u64,
    pub steals: u64,
    pub blocks: u64,
    pub turnovers: u64,
    pub personal_fouls: u64,
    pub minutes: f64,
    pub clutch_score: f64,
}

/// Per-game rates (total / matches).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SeasonAverages {
    pub points: f64,
    pub field_goals: f64,
    pub field_goal_attempts: f64,
    pub free_throws: f64,
    pub free_throw_attempts: f64,
    pub three_point_field_goals: f64,
    pub three_point_field_goal_attempts: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub blocks: f64,
    pub turnovers: f64,
    pub personal_fouls: f64,
    pub minutes: f64,
    pub clutch_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSeasonSummary {
    pub player_name: String,
    /// Team of the first game seen for this player.
    pub team: String,
    pub matches: u32,
    pub totals: SeasonTotals,
    pub averages: SeasonAverages,
}

impl PlayerSeasonSummary {
    fn start(line: &GameStatLine) -> Self {
        Self {
            player_name: line.player_name.clone(),
            team: line.team.clone(),
            matches: 0,
            totals: SeasonTotals::default(),
            averages: SeasonAverages::default(),
        }
    }

    fn add_game(&mut self, line: &GameStatLine) {
        let s = &line.stats;
        let t = &mut self.totals;
        self.matches += 1;
        t.points += u64::from(s.points);
        t.field_goals += u64::from(s.field_goals);
        t.field_goal_attempts += u64::from(s.field_goal_attempts);
        t.free_throws += u64::from(s.free_throws);
        t.free_throw_attempts += u64::from(s.free_throw_attempts);
        t.three_point_field_goals += u64::from(s.three_point_field_goals);
        t.three_point_field_goal_attempts += u64::from(s.three_point_field_goal_attempts);
        t.rebounds += u64::from(s.rebounds);
        t.assists += u64::from(s.assists);
        t.steals += u64::from(s.steals);
        t.blocks += u64::from(s.blocks);
        t.turnovers += u64::from(s.turnovers);
        t.personal_fouls += u64::from(s.personal_fouls);
        if let Some(minutes) = line.minutes {
            t.minutes += minutes;
        }
        t.clutch_score += calculate_clutch_score(line);
    }

    fn finish(&mut self) {
        if self.matches == 0 {
            return;
        }
        let n = f64::from(self.matches);
        let t = &self.totals;
        let per_game = |total: u64| total as f64 / n;
        self.averages = SeasonAverages {
            points: per_game(t.points),
            field_goals: per_game(t.field_goals),
            field_goal_attempts: per_game(t.field_goal_attempts),
            free_throws: per_game(t.free_throws),
            free_throw_attempts: per_game(t.free_throw_attempts),
            three_point_field_goals: per_game(t.three_point_field_goals),
            three_point_field_goal_attempts: per_game(t.three_point_field_goal_attempts),
            rebounds: per_game(t.rebounds),
            assists: per_game(t.assists),
            steals: per_game(t.steals),
            blocks: per_game(t.blocks),
            turnovers: per_game(t.turnovers),
            personal_fouls: per_game(t.personal_fouls),
            minutes: t.minutes / n,
            clutch_score: t.clutch_score / n,
        };
    }

    /// Field goal percentage (0-100) over the season.
    pub fn field_goal_pct(&self) -> f64 {
        pct(self.totals.field_goals, self.totals.field_goal_attempts)
    }

    pub fn free_throw_pct(&self) -> f64 {
        pct(self.totals.free_throws, self.totals.free_throw_attempts)
    }

    pub fn three_point_pct(&self) -> f64 {
        pct(
            self.totals.three_point_field_goals,
            self.totals.three_point_field_goal_attempts,
        )
    }
}

fn pct(made: u64, attempts: u64) -> f64 {
    if attempts > 0 {
        made as f64 / attempts as f64 * 100.0
    } else {
        0.0
    }
}

/// Season summaries keyed by player name, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct SeasonTable {
    players: Vec<PlayerSeasonSummary>,
    index: HashMap<String, usize>,
}

impl SeasonTable {
    pub fn get(&self, player_name: &str) -> Option<&PlayerSeasonSummary> {
        self.index.get(player_name).map(|&idx| &self.players[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerSeasonSummary> {
        self.players.iter()
    }

    pub fn as_slice(&self) -> &[PlayerSeasonSummary] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn into_vec(self) -> Vec<PlayerSeasonSummary> {
        self.players
    }
}

/// Folds game lines into one summary per distinct player name and computes the
/// per-game averages. The first line seen for a player fixes its team.
pub fn calculate_player_averages(lines: &[GameStatLine]) -> SeasonTable {
    let mut players: Vec<PlayerSeasonSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in lines {
        let idx = *index.entry(line.player_name.clone()).or_insert_with(|| {
            players.push(PlayerSeasonSummary::start(line));
            players.len() - 1
        });
        players[idx].add_game(line);
    }

    for summary in &mut players {
        summary.finish();
    }

    SeasonTable { players, index }
}
