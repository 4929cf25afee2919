use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::report::Report;
use crate::shots::{ShotEvent, ShotType};

/// Clock window (seconds) that makes a late-game shot "clutch". Inclusive.
pub const CLUTCH_WINDOW_SECS: u32 = 120;
/// Largest score margin for a clutch shot to count as "critical". Inclusive.
pub const CRITICAL_MARGIN: u32 = 5;

// Only the leading team's phrasing is recognized; other wordings never match.
static LEAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"now leads (\d+)-(\d+)").expect("lead pattern is valid"));

pub fn is_late_game(quarter: &str) -> bool {
    quarter == "4th" || quarter.contains("OT")
}

/// Late game with at most two minutes on the clock.
pub fn is_clutch(shot: &ShotEvent) -> bool {
    is_late_game(&shot.quarter)
        && shot
            .seconds_remaining
            .is_some_and(|secs| secs <= CLUTCH_WINDOW_SECS)
}

/// Absolute margin from a `"... now leads X-Y ..."` description.
pub fn score_margin(description: &str) -> Option<u32> {
    let caps = LEAD_RE.captures(description)?;
    let leading: u32 = caps.get(1)?.as_str().parse().ok()?;
    let trailing: u32 = caps.get(2)?.as_str().parse().ok()?;
    Some(leading.abs_diff(trailing))
}

/// Clutch shot taken with the margin at five points or fewer.
pub fn is_critical(shot: &ShotEvent) -> bool {
    is_clutch(shot)
        && shot
            .score_description
            .as_deref()
            .and_then(score_margin)
            .is_some_and(|margin| margin <= CRITICAL_MARGIN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Situation {
    Regular,
    Clutch,
    Critical,
}

pub fn classify(shot: &ShotEvent) -> Situation {
    if !is_clutch(shot) {
        Situation::Regular
    } else if is_critical(shot) {
        Situation::Critical
    } else {
        Situation::Clutch
    }
}

fn pct(made: u32, attempts: u32) -> f64 {
    if attempts > 0 {
        f64::from(made) / f64::from(attempts) * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MakeSplit {
    pub attempts: u32,
    pub made: u32,
    pub percentage: f64,
}

impl MakeSplit {
    fn new(attempts: u32, made: u32) -> Self {
        Self {
            attempts,
            made,
            percentage: pct(made, attempts),
        }
    }
}

/// Attempts / makes / percentage for a set of shots, split by shot value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ShotStats {
    pub total: u32,
    pub made: u32,
    pub percentage: f64,
    pub two_pointers: MakeSplit,
    pub three_pointers: MakeSplit,
}

impl ShotStats {
    pub fn from_shots<'a>(shots: impl IntoIterator<Item = &'a ShotEvent>) -> Self {
        let mut tally = Tally::default();
        for shot in shots {
            tally.add(shot);
        }
        tally.stats()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Tally {
    total: u32,
    made: u32,
    twos: u32,
    twos_made: u32,
    threes: u32,
    threes_made: u32,
    distance_sum: u64,
}

impl Tally {
    pub(crate) fn add(&mut self, shot: &ShotEvent) {
        self.total += 1;
        self.distance_sum += u64::from(shot.distance_ft);
        if shot.made {
            self.made += 1;
        }
        match shot.shot_type {
            ShotType::TwoPointer => {
                self.twos += 1;
                if shot.made {
                    self.twos_made += 1;
                }
            }
            ShotType::ThreePointer => {
                self.threes += 1;
                if shot.made {
                    self.threes_made += 1;
                }
            }
            ShotType::Other(_) => {}
        }
    }

    pub(crate) fn stats(&self) -> ShotStats {
        ShotStats {
            total: self.total,
            made: self.made,
            percentage: pct(self.made, self.total),
            two_pointers: MakeSplit::new(self.twos, self.twos_made),
            three_pointers: MakeSplit::new(self.threes, self.threes_made),
        }
    }

    fn average_distance(&self) -> f64 {
        if self.total > 0 {
            self.distance_sum as f64 / f64::from(self.total)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SituationDistribution {
    pub regular: u32,
    /// Clutch shots that are not critical.
    pub clutch: u32,
    pub critical: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClutchBreakdown {
    pub overall: ShotStats,
    pub regular: ShotStats,
    /// Every clutch shot, critical ones included.
    pub clutch: ShotStats,
    pub critical: ShotStats,
    pub distribution: SituationDistribution,
}

pub fn clutch_breakdown(shots: &[ShotEvent]) -> Report<ClutchBreakdown> {
    if shots.is_empty() {
        return Report::Insufficient;
    }
    let mut overall = Tally::default();
    let mut regular = Tally::default();
    let mut clutch = Tally::default();
    let mut critical = Tally::default();
    for shot in shots {
        overall.add(shot);
        match classify(shot) {
            Situation::Regular => regular.add(shot),
            Situation::Clutch => clutch.add(shot),
            Situation::Critical => {
                clutch.add(shot);
                critical.add(shot);
            }
        }
    }
    Report::Ready(ClutchBreakdown {
        overall: overall.stats(),
        regular: regular.stats(),
        clutch: clutch.stats(),
        critical: critical.stats(),
        distribution: SituationDistribution {
            regular: regular.total,
            clutch: clutch.total - critical.total,
            critical: critical.total,
        },
    })
}

pub fn clutch_shots(shots: &[ShotEvent]) -> Vec<&ShotEvent> {
    shots.iter().filter(|s| is_clutch(s)).collect()
}

pub fn critical_shots(shots: &[ShotEvent]) -> Vec<&ShotEvent> {
    shots.iter().filter(|s| is_critical(s)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceBucket {
    pub label: &'static str,
    pub min: u32,
    /// Inclusive upper bound; `None` for the open-ended bucket.
    pub max: Option<u32>,
}

impl DistanceBucket {
    pub fn contains(&self, distance_ft: u32) -> bool {
        distance_ft >= self.min && self.max.is_none_or(|max| distance_ft <= max)
    }
}

/// Shot distances are unsigned, so a negative distance in the feed decodes to 0
/// and lands in `0-3`.
#[rustfmt::skip]
pub const DISTANCE_BUCKETS: [DistanceBucket; 8] = [
    DistanceBucket { label: "0-3", min: 0, max: Some(3) },
    DistanceBucket { label: "4-6", min: 4, max: Some(6) },
    DistanceBucket { label: "7-10", min: 7, max: Some(10) },
    DistanceBucket { label: "11-15", min: 11, max: Some(15) },
    DistanceBucket { label: "16-20", min: 16, max: Some(20) },
    DistanceBucket { label: "21-25", min: 21, max: Some(25) },
    DistanceBucket { label: "26-30", min: 26, max: Some(30) },
    DistanceBucket { label: "31+", min: 31, max: None },
];

pub fn bucket_index(distance_ft: u32) -> usize {
    DISTANCE_BUCKETS
        .iter()
        .position(|b| b.contains(distance_ft))
        .unwrap_or(DISTANCE_BUCKETS.len() - 1)
}

pub fn distance_bucket(distance_ft: u32) -> &'static DistanceBucket {
    &DISTANCE_BUCKETS[bucket_index(distance_ft)]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceRow {
    pub range: &'static str,
    pub stats: ShotStats,
    pub average_distance: f64,
}

/// Per-bucket stats in bucket order; empty buckets are omitted.
pub fn distance_report(shots: &[ShotEvent]) -> Report<Vec<DistanceRow>> {
    let mut tallies = [Tally::default(); DISTANCE_BUCKETS.len()];
    for shot in shots {
        tallies[bucket_index(shot.distance_ft)].add(shot);
    }
    let rows = DISTANCE_BUCKETS
        .iter()
        .zip(tallies.iter())
        .filter(|(_, t)| t.total > 0)
        .map(|(bucket, t)| DistanceRow {
            range: bucket.label,
            stats: t.stats(),
            average_distance: t.average_distance(),
        })
        .collect();
    Report::from_rows(rows)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterRow {
    pub quarter: String,
    pub stats: ShotStats,
}

/// One row per distinct quarter label (every overtime label is its own row),
/// sorted lexicographically.
pub fn quarter_report(shots: &[ShotEvent]) -> Report<Vec<QuarterRow>> {
    let mut by_quarter: BTreeMap<&str, Tally> = BTreeMap::new();
    for shot in shots {
        by_quarter.entry(shot.quarter.as_str()).or_default().add(shot);
    }
    let rows = by_quarter
        .into_iter()
        .map(|(quarter, t)| QuarterRow {
            quarter: quarter.to_string(),
            stats: t.stats(),
        })
        .collect();
    Report::from_rows(rows)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeFilter {
    #[default]
    All,
    Made,
    Missed,
}

/// Shot chart selection: outcome, quarter (substring of the label) and value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotFilter {
    pub outcome: OutcomeFilter,
    pub quarter: Option<String>,
    pub shot_type: Option<ShotType>,
}

impl ShotFilter {
    pub fn matches(&self, shot: &ShotEvent) -> bool {
        let outcome_ok = match self.outcome {
            OutcomeFilter::All => true,
            OutcomeFilter::Made => shot.made,
            OutcomeFilter::Missed => !shot.made,
        };
        let quarter_ok = self
            .quarter
            .as_deref()
            .is_none_or(|q| shot.quarter.contains(q));
        let type_ok = self
            .shot_type
            .as_ref()
            .is_none_or(|t| &shot.shot_type == t);
        outcome_ok && quarter_ok && type_ok
    }

    pub fn apply<'a>(&self, shots: &'a [ShotEvent]) -> Vec<&'a ShotEvent> {
        shots.iter().filter(|s| self.matches(s)).collect()
    }
}
