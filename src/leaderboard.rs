use std::cmp::Ordering;

use serde::Serialize;

use crate::season::PlayerSeasonSummary;

/// Players need this many games to appear on the leaderboard.
pub const MIN_MATCHES: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortStat {
    #[default]
    ClutchScore,
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    PersonalFouls,
    Minutes,
    Matches,
    FieldGoals,
    FieldGoalAttempts,
    FieldGoalPct,
    FreeThrowPct,
    ThreePointPct,
}

impl SortStat {
    pub fn parse(raw: &str) -> Option<Self> {
        let stat = match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "clutch" | "clutch_score" | "clutchscore" => SortStat::ClutchScore,
            "points" | "pts" => SortStat::Points,
            "rebounds" | "reb" => SortStat::Rebounds,
            "assists" | "ast" => SortStat::Assists,
            "steals" | "stl" => SortStat::Steals,
            "blocks" | "blk" => SortStat::Blocks,
            "turnovers" | "tov" => SortStat::Turnovers,
            "personal_fouls" | "pf" => SortStat::PersonalFouls,
            "minutes" | "min" => SortStat::Minutes,
            "matches" | "games" => SortStat::Matches,
            "field_goals" | "fg" => SortStat::FieldGoals,
            "field_goal_attempts" | "fga" => SortStat::FieldGoalAttempts,
            "fg_pct" | "fg%" => SortStat::FieldGoalPct,
            "ft_pct" | "ft%" => SortStat::FreeThrowPct,
            "three_pct" | "3p%" | "3p_pct" => SortStat::ThreePointPct,
            _ => return None,
        };
        Some(stat)
    }

    /// Per-game value (or percentage) used for sorting.
    pub fn value(self, p: &PlayerSeasonSummary) -> f64 {
        let a = &p.averages;
        match self {
            SortStat::ClutchScore => a.clutch_score,
            SortStat::Points => a.points,
            SortStat::Rebounds => a.rebounds,
            SortStat::Assists => a.assists,
            SortStat::Steals => a.steals,
            SortStat::Blocks => a.blocks,
            SortStat::Turnovers => a.turnovers,
            SortStat::PersonalFouls => a.personal_fouls,
            SortStat::Minutes => a.minutes,
            SortStat::Matches => f64::from(p.matches),
            SortStat::FieldGoals => a.field_goals,
            SortStat::FieldGoalAttempts => a.field_goal_attempts,
            SortStat::FieldGoalPct => p.field_goal_pct(),
            SortStat::FreeThrowPct => p.free_throw_pct(),
            SortStat::ThreePointPct => p.three_point_pct(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

#[derive(Debug, Clone, Default)]
pub struct LeaderboardQuery {
    /// Case-insensitive substring of the player name; empty matches everyone.
    pub search: String,
    /// Exact team code; `None` for all teams.
    pub team: Option<String>,
    pub sort_by: SortStat,
    pub order: SortOrder,
}

impl LeaderboardQuery {
    fn matches(&self, p: &PlayerSeasonSummary) -> bool {
        let needle = self.search.trim().to_lowercase();
        let name_ok = needle.is_empty() || p.player_name.to_lowercase().contains(&needle);
        let team_ok = self.team.as_deref().is_none_or(|t| p.team == t);
        name_ok && team_ok
    }
}

/// Qualified players (enough matches) in table order.
#[derive(Debug, Clone)]
pub struct Leaderboard<'a> {
    players: Vec<&'a PlayerSeasonSummary>,
}

impl<'a> Leaderboard<'a> {
    pub fn new(summaries: &'a [PlayerSeasonSummary], min_matches: u32) -> Self {
        Self {
            players: summaries
                .iter()
                .filter(|p| p.matches >= min_matches)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[&'a PlayerSeasonSummary] {
        &self.players
    }

    pub fn query(&self, q: &LeaderboardQuery) -> Vec<&'a PlayerSeasonSummary> {
        let mut rows: Vec<&'a PlayerSeasonSummary> =
            self.players.iter().copied().filter(|p| q.matches(p)).collect();
        rows.sort_by(|a, b| {
            let ord = q
                .sort_by
                .value(a)
                .partial_cmp(&q.sort_by.value(b))
                .unwrap_or(Ordering::Equal);
            match q.order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        rows
    }

    pub fn top_clutch(&self, n: usize) -> Vec<&'a PlayerSeasonSummary> {
        let mut rows = self.query(&LeaderboardQuery::default());
        rows.truncate(n);
        rows
    }

    /// Distinct non-empty team codes, first appearance first.
    pub fn teams(&self) -> Vec<&'a str> {
        let mut out: Vec<&'a str> = Vec::new();
        for p in &self.players {
            let team = p.team.as_str();
            if !team.is_empty() && !out.contains(&team) {
                out.push(team);
            }
        }
        out
    }

    pub fn benchmarks(&self) -> LeagueBenchmarks {
        LeagueBenchmarks::from_players(&self.players)
    }

    pub fn efficiency_points(&self) -> Vec<EfficiencyPoint> {
        self.players
            .iter()
            .map(|p| EfficiencyPoint {
                name: p.player_name.clone(),
                minutes: round1(p.averages.minutes),
                points: round1(p.averages.points),
                clutch_score: round1(p.averages.clutch_score),
                fg_percentage: round1(p.field_goal_pct()),
            })
            .collect()
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Benchmark {
    pub avg: f64,
    pub max: f64,
}

impl Benchmark {
    fn over(values: impl Iterator<Item = f64>) -> Self {
        let mut n = 0usize;
        let mut sum = 0.0;
        let mut max = 0.0_f64;
        for v in values {
            n += 1;
            sum += v;
            max = max.max(v);
        }
        if n == 0 {
            return Self::default();
        }
        Self {
            avg: sum / n as f64,
            max,
        }
    }
}

/// League-wide averages and maxima over the qualified players.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LeagueBenchmarks {
    pub points: Benchmark,
    pub rebounds: Benchmark,
    pub assists: Benchmark,
    /// Max is pinned to 100 once any player qualifies.
    pub fg_percentage: Benchmark,
    pub clutch_score: Benchmark,
}

impl LeagueBenchmarks {
    pub fn from_players(players: &[&PlayerSeasonSummary]) -> Self {
        if players.is_empty() {
            return Self::default();
        }
        let over =
            |f: fn(&PlayerSeasonSummary) -> f64| Benchmark::over(players.iter().map(|p| f(*p)));
        let fg = over(|p| p.field_goal_pct());
        Self {
            points: over(|p| p.averages.points),
            rebounds: over(|p| p.averages.rebounds),
            assists: over(|p| p.averages.assists),
            fg_percentage: Benchmark {
                avg: fg.avg,
                max: 100.0,
            },
            clutch_score: over(|p| p.averages.clutch_score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub stat: &'static str,
    /// Player value on a 0-100 scale.
    pub player: f64,
    /// League average on the same scale.
    pub league: f64,
    pub raw_player: f64,
    pub raw_league: f64,
}

fn normalize(value: f64, max: f64) -> f64 {
    if max > 0.0 { value / max * 100.0 } else { 0.0 }
}

/// Five-axis profile of a player against the league, each axis scaled by the
/// league maximum. FG% is already a percentage and is not rescaled.
pub fn radar_profile(player: &PlayerSeasonSummary, league: &LeagueBenchmarks) -> Vec<RadarAxis> {
    let scaled = |stat, value: f64, b: Benchmark| RadarAxis {
        stat,
        player: normalize(value, b.max),
        league: normalize(b.avg, b.max),
        raw_player: value,
        raw_league: b.avg,
    };
    let fg = player.field_goal_pct();
    vec![
        scaled("Points", player.averages.points, league.points),
        scaled("Rebounds", player.averages.rebounds, league.rebounds),
        scaled("Assists", player.averages.assists, league.assists),
        RadarAxis {
            stat: "FG%",
            player: fg,
            league: league.fg_percentage.avg,
            raw_player: fg,
            raw_league: league.fg_percentage.avg,
        },
        scaled("Clutch score", player.averages.clutch_score, league.clutch_score),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyPoint {
    pub name: String,
    pub minutes: f64,
    pub points: f64,
    pub clutch_score: f64,
    pub fg_percentage: f64,
}
