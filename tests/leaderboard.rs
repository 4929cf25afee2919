use std::fs;
use std::path::PathBuf;

use nba_clutch::game_stats::parse_game_lines_json;
use nba_clutch::leaderboard::{
    Leaderboard, LeaderboardQuery, LeagueBenchmarks, MIN_MATCHES, SortOrder, SortStat,
    radar_profile,
};
use nba_clutch::season::{SeasonTable, calculate_player_averages};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_table() -> SeasonTable {
    let lines =
        parse_game_lines_json(&read_fixture("game_lines.json")).expect("fixture should parse");
    calculate_player_averages(&lines)
}

fn names(rows: &[&nba_clutch::season::PlayerSeasonSummary]) -> Vec<String> {
    rows.iter().map(|p| p.player_name.clone()).collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn default_minimum_excludes_short_seasons() {
    let table = fixture_table();
    let board = Leaderboard::new(table.as_slice(), MIN_MATCHES);
    assert!(board.is_empty());
    assert_eq!(board.benchmarks(), LeagueBenchmarks::default());
    assert!(board.top_clutch(5).is_empty());
}

#[test]
fn qualified_players_sorted_by_clutch_score() {
    let table = fixture_table();
    let board = Leaderboard::new(table.as_slice(), 2);
    assert_eq!(board.len(), 2);
    let rows = board.query(&LeaderboardQuery::default());
    assert_eq!(names(&rows), ["Stephen Curry", "LeBron James"]);
    assert_eq!(names(&board.top_clutch(1)), ["Stephen Curry"]);
    assert_eq!(board.teams(), ["GSW", "LAL"]);
}

#[test]
fn sort_by_stat_and_order() {
    let table = fixture_table();
    let board = Leaderboard::new(table.as_slice(), 1);
    let by_points_asc = board.query(&LeaderboardQuery {
        sort_by: SortStat::Points,
        order: SortOrder::Ascending,
        ..LeaderboardQuery::default()
    });
    assert_eq!(
        names(&by_points_asc),
        ["LeBron James", "Stephen Curry", "Jayson Tatum"]
    );

    let by_matches = board.query(&LeaderboardQuery {
        sort_by: SortStat::parse("games").expect("known stat"),
        ..LeaderboardQuery::default()
    });
    assert_eq!(
        names(&by_matches),
        ["Stephen Curry", "LeBron James", "Jayson Tatum"]
    );
    assert_eq!(SortStat::parse("fg%"), Some(SortStat::FieldGoalPct));
    assert_eq!(SortStat::parse("height"), None);
}

#[test]
fn search_and_team_filters() {
    let table = fixture_table();
    let board = Leaderboard::new(table.as_slice(), 1);
    let search = board.query(&LeaderboardQuery {
        search: "  CURR ".into(),
        ..LeaderboardQuery::default()
    });
    assert_eq!(names(&search), ["Stephen Curry"]);

    let team = board.query(&LeaderboardQuery {
        team: Some("LAL".into()),
        ..LeaderboardQuery::default()
    });
    assert_eq!(names(&team), ["LeBron James"]);

    let nobody = board.query(&LeaderboardQuery {
        search: "james".into(),
        team: Some("BOS".into()),
        ..LeaderboardQuery::default()
    });
    assert!(nobody.is_empty());
}

#[test]
fn benchmarks_and_radar() {
    let table = fixture_table();
    let board = Leaderboard::new(table.as_slice(), 2);
    let b = board.benchmarks();
    let curry_points = 62.0 / 3.0;
    assert!(close(b.points.max, curry_points));
    assert!(close(b.points.avg, (curry_points + 12.5) / 2.0));
    assert_eq!(b.fg_percentage.max, 100.0);

    let curry = table.get("Stephen Curry").expect("curry");
    let radar = radar_profile(curry, &b);
    assert_eq!(radar.len(), 5);
    assert_eq!(radar[0].stat, "Points");
    assert!(close(radar[0].player, 100.0));
    assert!(close(radar[0].league, b.points.avg / b.points.max * 100.0));
    assert!(close(radar[3].player, curry.field_goal_pct()));
    assert!(radar.iter().all(|axis| axis.player <= 100.0 + 1e-9));
}

#[test]
fn efficiency_points_are_rounded() {
    let table = fixture_table();
    let board = Leaderboard::new(table.as_slice(), 2);
    let points = board.efficiency_points();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].name, "Stephen Curry");
    assert_eq!(points[0].points, 20.7);
    assert_eq!(points[0].minutes, 21.5);
    assert_eq!(points[0].clutch_score, 37.1);
}
