use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::leaderboard::MIN_MATCHES;
use crate::shot_repository::DEFAULT_SEASON;

const DEFAULT_DATA_DIR: &str = "data/shots";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Local snapshot directory holding `<key>.json` shot resources.
    pub data_dir: PathBuf,
    /// When set, shot resources are fetched from `<data_url>/<key>.json` instead.
    pub data_url: Option<String>,
    pub season: String,
    pub min_matches: u32,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            data_url: None,
            season: DEFAULT_SEASON.to_string(),
            min_matches: MIN_MATCHES,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank or invalid values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let defaults = Self::default();

        let data_dir = text("NBA_CLUTCH_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let data_url = text("NBA_CLUTCH_DATA_URL").map(|u| u.trim_end_matches('/').to_string());
        let season = text("NBA_CLUTCH_SEASON").unwrap_or(defaults.season);
        let min_matches = text("NBA_CLUTCH_MIN_MATCHES")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.min_matches);
        let timeout_secs = text("HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
            .clamp(1, 300);

        Self {
            data_dir,
            data_url,
            season,
            min_matches,
            http_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
