use serde::Serialize;

use crate::report::Report;
use crate::shot_classifier::{QuarterRow, ShotStats, Tally, quarter_report};
use crate::shots::ShotEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtZone {
    Perimeter,
    MidRange,
    NearBasket,
}

impl CourtZone {
    pub const ALL: [CourtZone; 3] = [
        CourtZone::Perimeter,
        CourtZone::MidRange,
        CourtZone::NearBasket,
    ];

    pub fn for_distance(distance_ft: u32) -> Self {
        if distance_ft > 20 {
            CourtZone::Perimeter
        } else if distance_ft > 10 {
            CourtZone::MidRange
        } else {
            CourtZone::NearBasket
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CourtZone::Perimeter => "Perimeter",
            CourtZone::MidRange => "Mid-range",
            CourtZone::NearBasket => "Near basket",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneRow {
    pub zone: CourtZone,
    pub stats: ShotStats,
}

/// Stats for each court zone, perimeter first. Zones are always listed, even
/// when empty, so two players line up row for row.
pub fn zone_stats(shots: &[ShotEvent]) -> Vec<ZoneRow> {
    let mut tallies = [Tally::default(); 3];
    for shot in shots {
        let idx = match CourtZone::for_distance(shot.distance_ft) {
            CourtZone::Perimeter => 0,
            CourtZone::MidRange => 1,
            CourtZone::NearBasket => 2,
        };
        tallies[idx].add(shot);
    }
    CourtZone::ALL
        .iter()
        .zip(tallies.iter())
        .map(|(zone, t)| ZoneRow {
            zone: *zone,
            stats: t.stats(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerShotProfile {
    pub player_id: String,
    pub player_name: String,
    pub team: String,
    pub overall: ShotStats,
    pub quarters: Vec<QuarterRow>,
    pub zones: Vec<ZoneRow>,
}

impl PlayerShotProfile {
    /// Identity comes from the first shot. `None` for an empty list.
    pub fn from_shots(shots: &[ShotEvent]) -> Option<Self> {
        let first = shots.first()?;
        Some(Self {
            player_id: first.player_id.clone(),
            player_name: first.display_name().to_string(),
            team: first.team_code().to_string(),
            overall: ShotStats::from_shots(shots),
            quarters: quarter_report(shots).into_ready().unwrap_or_default(),
            zones: zone_stats(shots),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerComparison {
    pub first: PlayerShotProfile,
    pub second: PlayerShotProfile,
}

impl PlayerComparison {
    /// Differences in make percentage (first minus second): overall, 2pt, 3pt.
    pub fn percentage_gaps(&self) -> [f64; 3] {
        let a = &self.first.overall;
        let b = &self.second.overall;
        [
            a.percentage - b.percentage,
            a.two_pointers.percentage - b.two_pointers.percentage,
            a.three_pointers.percentage - b.three_pointers.percentage,
        ]
    }
}

pub fn compare_players(first: &[ShotEvent], second: &[ShotEvent]) -> Report<PlayerComparison> {
    match (
        PlayerShotProfile::from_shots(first),
        PlayerShotProfile::from_shots(second),
    ) {
        (Some(first), Some(second)) => Report::Ready(PlayerComparison { first, second }),
        _ => Report::Insufficient,
    }
}
