use crate::game_stats::{BoxScore, GameStatLine};

const FG_WEIGHT: f64 = 10.0;
const FT_WEIGHT: f64 = 5.0;
const THREE_WEIGHT: f64 = 15.0;

const REBOUND_WEIGHT: f64 = 0.5;
const ASSIST_WEIGHT: f64 = 0.7;
const STEAL_WEIGHT: f64 = 1.2;
const BLOCK_WEIGHT: f64 = 1.2;
const TURNOVER_WEIGHT: f64 = 1.0;

/// Component breakdown of a single game's clutch score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClutchComponents {
    pub scoring: f64,
    pub efficiency: f64,
    pub impact: f64,
}

impl ClutchComponents {
    pub fn from_box_score(stats: &BoxScore) -> Self {
        let scoring = f64::from(stats.points);
        let efficiency = stats.field_goal_ratio() * FG_WEIGHT
            + stats.free_throw_ratio() * FT_WEIGHT
            + stats.three_point_ratio() * THREE_WEIGHT;
        let impact = f64::from(stats.rebounds) * REBOUND_WEIGHT
            + f64::from(stats.assists) * ASSIST_WEIGHT
            + f64::from(stats.steals) * STEAL_WEIGHT
            + f64::from(stats.blocks) * BLOCK_WEIGHT
            - f64::from(stats.turnovers) * TURNOVER_WEIGHT;
        Self {
            scoring,
            efficiency,
            impact,
        }
    }

    /// Composite score floored at zero.
    pub fn score(&self) -> f64 {
        (self.scoring + self.efficiency + self.impact).max(0.0)
    }
}

/// Weighted composite of scoring, shooting efficiency and net contributions for
/// one game. Raw performance only: minutes played do not scale the result.
pub fn calculate_clutch_score(line: &GameStatLine) -> f64 {
    clutch_score_for(&line.stats)
}

pub fn clutch_score_for(stats: &BoxScore) -> f64 {
    ClutchComponents::from_box_score(stats).score()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_scores_zero() {
        assert_eq!(clutch_score_for(&BoxScore::default()), 0.0);
    }

    #[test]
    fn turnovers_cannot_push_below_zero() {
        let stats = BoxScore {
            turnovers: 6,
            ..BoxScore::default()
        };
        let parts = ClutchComponents::from_box_score(&stats);
        assert!(parts.impact < 0.0);
        assert_eq!(parts.score(), 0.0);
    }

    #[test]
    fn weights_applied() {
        let stats = BoxScore {
            points: 10,
            field_goals: 4,
            field_goal_attempts: 8,
            free_throws: 2,
            free_throw_attempts: 2,
            three_point_field_goals: 0,
            three_point_field_goal_attempts: 3,
            rebounds: 2,
            assists: 1,
            steals: 1,
            blocks: 0,
            turnovers: 1,
            personal_fouls: 4,
        };
        // 10 + (0.5*10 + 1.0*5 + 0) + (1.0 + 0.7 + 1.2 - 1.0)
        let expected = 10.0 + 10.0 + 1.9;
        assert!((clutch_score_for(&stats) - expected).abs() < 1e-9);
    }
}
