use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use rayon::prelude::*;
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::http_cache::ResponseCache;
use crate::http_client::http_client;
use crate::shots::{ShotEvent, parse_combined_shots_json, parse_shots_json};
use crate::teams::TEAM_CODES;

pub const DEFAULT_SEASON: &str = "2024";

/// Raw JSON for a resource key such as `gsw_shots_2024`.
pub trait ShotSource: Sync {
    fn fetch(&self, key: &str) -> Result<String>;
}

impl<T: ShotSource + ?Sized> ShotSource for Box<T> {
    fn fetch(&self, key: &str) -> Result<String> {
        (**self).fetch(key)
    }
}

/// Snapshot directory laid out as `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct DirShotSource {
    root: PathBuf,
}

impl DirShotSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ShotSource for DirShotSource {
    fn fetch(&self, key: &str) -> Result<String> {
        let path = self.root.join(format!("{key}.json"));
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }
}

/// Static file host serving `<base_url>/<key>.json`.
#[derive(Debug)]
pub struct HttpShotSource {
    base_url: String,
    client: Client,
    cache: ResponseCache,
}

impl HttpShotSource {
    /// Shared client, responses cached in the user cache directory.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = http_client(timeout)?.clone();
        Ok(Self::with_client(base_url, client, ResponseCache::in_user_cache_dir()))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client, cache: ResponseCache) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client,
            cache,
        }
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{key}.json", self.base_url)
    }
}

impl ShotSource for HttpShotSource {
    fn fetch(&self, key: &str) -> Result<String> {
        self.cache.fetch_json(&self.client, &self.url_for(key))
    }
}

pub fn team_key(team: &str, season: &str) -> String {
    format!("{}_shots_{season}", team.to_lowercase())
}

/// Only the first `/` of the id is replaced, matching how player files are named.
pub fn player_key(player_id: &str, season: &str) -> String {
    format!("player_{}_{season}", player_id.replacen('/', "_", 1))
}

pub fn combined_key(season: &str) -> String {
    format!("all_teams_shots_{season}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerListing {
    pub id: String,
    pub name: String,
    pub team: String,
}

/// Resolves shot events with file fallbacks. Lookups never fail: a missing
/// resource yields an empty list and a log line.
pub struct ShotRepository<S> {
    source: S,
}

impl<S: ShotSource> ShotRepository<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn fetch_with(
        &self,
        key: &str,
        parse: fn(&str) -> Result<Vec<ShotEvent>>,
    ) -> Result<Vec<ShotEvent>> {
        let raw = self.source.fetch(key)?;
        parse(&raw).with_context(|| format!("decode {key}"))
    }

    fn try_team_shots(&self, team: &str, season: &str) -> Result<Vec<ShotEvent>> {
        self.fetch_with(&team_key(team, season), parse_shots_json)
    }

    pub fn load_team_shots(&self, team: &str, season: &str) -> Vec<ShotEvent> {
        match self.try_team_shots(team, season) {
            Ok(shots) => shots,
            Err(err) => {
                debug!(team, season, error = %format!("{err:#}"), "team shots unavailable");
                Vec::new()
            }
        }
    }

    /// Dedicated player file first, then the first team file that has shots
    /// for this player, in team-code order.
    pub fn load_player_shots(&self, player_id: &str, season: &str) -> Vec<ShotEvent> {
        match self.fetch_with(&player_key(player_id, season), parse_shots_json) {
            Ok(shots) => return shots,
            Err(err) => {
                debug!(
                    player_id,
                    season,
                    error = %format!("{err:#}"),
                    "no player file, scanning teams"
                );
            }
        }

        for team in TEAM_CODES {
            let Ok(shots) = self.try_team_shots(team, season) else {
                continue;
            };
            let found: Vec<ShotEvent> = shots
                .into_iter()
                .filter(|s| s.player_id == player_id)
                .collect();
            if !found.is_empty() {
                debug!(player_id, team, shots = found.len(), "player found in team file");
                return found;
            }
        }

        warn!(player_id, season, "no shot data for player");
        Vec::new()
    }

    /// Combined season file when present, otherwise every team file in
    /// team-code order.
    pub fn load_all_shots(&self, season: &str) -> Vec<ShotEvent> {
        match self.fetch_with(&combined_key(season), parse_combined_shots_json) {
            Ok(shots) => {
                info!(season, shots = shots.len(), "loaded combined shot file");
                return shots;
            }
            Err(err) => {
                debug!(season, error = %format!("{err:#}"), "no combined file, loading teams");
            }
        }

        let per_team: Vec<Vec<ShotEvent>> = TEAM_CODES
            .par_iter()
            .map(|team| self.load_team_shots(team, season))
            .collect();
        let shots: Vec<ShotEvent> = per_team.into_iter().flatten().collect();
        if shots.is_empty() {
            warn!(season, "no shot data for any team");
        } else {
            info!(season, shots = shots.len(), "loaded team shot files");
        }
        shots
    }

    /// One entry per player id (first occurrence wins), sorted by name.
    pub fn available_players(&self, season: &str) -> Vec<PlayerListing> {
        let shots = self.load_all_shots(season);
        let mut seen: HashSet<&str> = HashSet::new();
        let mut players: Vec<PlayerListing> = Vec::new();
        for shot in &shots {
            if seen.insert(shot.player_id.as_str()) {
                players.push(PlayerListing {
                    id: shot.player_id.clone(),
                    name: shot.display_name().to_string(),
                    team: shot.team_code().to_string(),
                });
            }
        }
        players.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        players
    }
}
