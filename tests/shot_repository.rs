use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use nba_clutch::shot_repository::{DirShotSource, ShotRepository, ShotSource};

fn fixture_repo() -> ShotRepository<DirShotSource> {
    let mut root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    root.push("tests");
    root.push("fixtures");
    root.push("shots");
    ShotRepository::new(DirShotSource::new(root))
}

/// In-memory resources that remember which keys were asked for.
#[derive(Default)]
struct MemorySource {
    files: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl MemorySource {
    fn with(mut self, key: &str, body: &str) -> Self {
        self.files.insert(key.to_string(), body.to_string());
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().expect("request log").clone()
    }
}

impl ShotSource for MemorySource {
    fn fetch(&self, key: &str) -> Result<String> {
        self.requested.lock().expect("request log").push(key.to_string());
        self.files
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("missing {key}"))
    }
}

fn shot(id: &str, name: &str, team: &str) -> String {
    format!(
        r#"{{"player_id":"{id}","player_name":"{name} Overview","is_made":"True",
            "teams":"2024, {team} vs OPP","quarter":"1st","time_remaining":"5:00",
            "shot_type":"2-pointer","shot_distance":"4","game_date":"Dec 1"}}"#
    )
}

#[test]
fn player_file_is_preferred() {
    let repo = fixture_repo();
    let shots = repo.load_player_shots("c/curryst01", "2024");
    assert_eq!(shots.len(), 7);
    assert!(shots.iter().all(|s| s.player_id == "c/curryst01"));
}

#[test]
fn player_falls_back_to_team_files() {
    let repo = fixture_repo();
    let green = repo.load_player_shots("g/greendr01", "2024");
    assert_eq!(green.len(), 1);
    assert_eq!(green[0].display_name(), "Draymond Green");

    let tatum = repo.load_player_shots("t/tatumja01", "2024");
    assert_eq!(tatum.len(), 2);

    // bos_shots_2023 is not valid JSON and is skipped on the way to LAL.
    let lebron = repo.load_player_shots("j/jamesle01", "2023");
    assert_eq!(lebron.len(), 2);
}

#[test]
fn unknown_player_is_empty() {
    let repo = fixture_repo();
    assert!(repo.load_player_shots("n/nobody01", "2024").is_empty());
    assert!(repo.load_player_shots("", "1999").is_empty());
}

#[test]
fn team_lookup_is_case_insensitive_and_total() {
    let repo = fixture_repo();
    assert_eq!(repo.load_team_shots("gsw", "2024").len(), 3);
    assert_eq!(repo.load_team_shots("GSW", "2024").len(), 3);
    assert!(repo.load_team_shots("BOS", "2023").is_empty());
    assert!(repo.load_team_shots("XYZ", "2024").is_empty());
}

#[test]
fn combined_file_keeps_file_order() {
    let repo = fixture_repo();
    let shots = repo.load_all_shots("2024");
    let ids: Vec<&str> = shots.iter().map(|s| s.player_id.as_str()).collect();
    assert_eq!(ids, ["c/curryst01", "g/greendr01", "t/tatumja01", "c/curryst01"]);
}

#[test]
fn all_shots_fall_back_to_teams_in_code_order() {
    let repo = fixture_repo();
    let shots = repo.load_all_shots("2023");
    let ids: Vec<&str> = shots.iter().map(|s| s.player_id.as_str()).collect();
    assert_eq!(ids, ["c/curryst01", "j/jamesle01", "j/jamesle01"]);
    assert!(repo.load_all_shots("1999").is_empty());
}

#[test]
fn available_players_dedupes_and_sorts() {
    let repo = fixture_repo();
    let players = repo.available_players("2024");
    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Draymond Green", "Jayson Tatum", "Stephen Curry"]);
    let curry = &players[2];
    assert_eq!(curry.id, "c/curryst01");
    // The GSW entry comes first in the file, so the later DAL row is ignored.
    assert_eq!(curry.team, "GSW");
}

#[test]
fn player_key_replaces_first_slash_only() {
    let source = MemorySource::default().with(
        "player_a_b/c_2024",
        &format!("[{}]", shot("a/b/c", "Odd Id", "ATL")),
    );
    let repo = ShotRepository::new(source);
    assert_eq!(repo.load_player_shots("a/b/c", "2024").len(), 1);
    assert_eq!(repo.source().requested(), ["player_a_b/c_2024"]);
}

#[test]
fn team_scan_stops_at_first_match() {
    let source = MemorySource::default()
        .with("bos_shots_2024", &format!("[{}]", shot("x/one01", "One", "BOS")))
        .with("chi_shots_2024", &format!("[{}]", shot("x/one01", "One", "CHI")));
    let repo = ShotRepository::new(source);
    let shots = repo.load_player_shots("x/one01", "2024");
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].team_code(), "BOS");
    assert_eq!(
        repo.source().requested(),
        ["player_x_one01_2024", "atl_shots_2024", "bos_shots_2024"]
    );
}

#[test]
fn broken_player_file_falls_back() {
    let source = MemorySource::default()
        .with("player_x_one01_2024", "{ broken")
        .with("atl_shots_2024", &format!("[{}]", shot("x/one01", "One", "ATL")));
    let repo = ShotRepository::new(source);
    assert_eq!(repo.load_player_shots("x/one01", "2024").len(), 1);
}

#[test]
fn broken_combined_file_falls_back_to_teams() {
    let source = MemorySource::default()
        .with("all_teams_shots_2024", "[]")
        .with("was_shots_2024", &format!("[{}]", shot("w/last01", "Last", "WAS")))
        .with("atl_shots_2024", &format!("[{}]", shot("a/first01", "First", "ATL")));
    let repo = ShotRepository::new(source);
    let shots = repo.load_all_shots("2024");
    let ids: Vec<&str> = shots.iter().map(|s| s.player_id.as_str()).collect();
    assert_eq!(ids, ["a/first01", "w/last01"]);
    let requested = repo.source().requested();
    assert_eq!(requested.len(), 31);
    assert_eq!(requested[0], "all_teams_shots_2024");
}
