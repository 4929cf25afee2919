use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{
    ACCEPT, ETAG, HeaderMap, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

const CACHE_VERSION: u32 = 2;
const CACHE_DIR: &str = "nba_clutch";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedBody {
    version: u32,
    url: String,
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
}

impl CachedBody {
    fn from_response(url: &str, body: String, headers: &HeaderMap) -> Self {
        let header = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            version: CACHE_VERSION,
            url: url.to_string(),
            body,
            etag: header(ETAG),
            last_modified: header(LAST_MODIFIED),
        }
    }

    fn has_validator(&self) -> bool {
        self.etag.is_some() || self.last_modified.is_some()
    }
}

/// Conditional-GET cache for JSON resources. Every URL lives in its own file
/// under `dir`, so storing one response never rewrites the others. Without a
/// directory the cache only lasts for the process.
#[derive(Debug, Default)]
pub struct ResponseCache {
    dir: Option<PathBuf>,
    entries: Mutex<HashMap<String, CachedBody>>,
}

impl ResponseCache {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// `$XDG_CACHE_HOME/nba_clutch`, else `~/.cache/nba_clutch`.
    pub fn in_user_cache_dir() -> Self {
        Self::new(cache_dir_from(
            std::env::var("XDG_CACHE_HOME").ok().as_deref(),
            std::env::var("HOME").ok().as_deref(),
        ))
    }

    /// GETs a JSON document, revalidating a cached copy with `If-None-Match` /
    /// `If-Modified-Since`. A 304 serves the cached body; any other non-2xx
    /// status is an error.
    pub fn fetch_json(&self, client: &Client, url: &str) -> Result<String> {
        let cached = self.lookup(url);

        let mut req = client.get(url).header(ACCEPT, "application/json");
        if let Some(entry) = cached.as_ref() {
            if let Some(etag) = entry.etag.as_deref() {
                req = req.header(IF_NONE_MATCH, etag);
            }
            if let Some(last_modified) = entry.last_modified.as_deref() {
                req = req.header(IF_MODIFIED_SINCE, last_modified);
            }
        }

        let resp = req.send().with_context(|| format!("request failed: {url}"))?;
        let status = resp.status();
        if status == StatusCode::NOT_MODIFIED {
            let entry = cached.ok_or_else(|| anyhow!("received 304 without cache body"))?;
            debug!(url, "not modified, serving cached body");
            return Ok(entry.body);
        }

        let headers = resp.headers().clone();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {status} for {url}"));
        }

        let entry = CachedBody::from_response(url, body.clone(), &headers);
        if entry.has_validator() {
            self.store(entry);
        }
        Ok(body)
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CachedBody>> {
        self.entries.lock().expect("response cache lock poisoned")
    }

    fn lookup(&self, url: &str) -> Option<CachedBody> {
        if let Some(entry) = self.entries().get(url) {
            return Some(entry.clone());
        }
        let entry = load_entry(&entry_path(self.dir.as_deref()?, url), url)?;
        self.entries().insert(url.to_string(), entry.clone());
        Some(entry)
    }

    fn store(&self, entry: CachedBody) {
        if let Some(dir) = self.dir.as_deref()
            && let Err(err) = save_entry(&entry_path(dir, &entry.url), &entry)
        {
            debug!(url = %entry.url, error = %err, "could not persist cached response");
        }
        self.entries().insert(entry.url.clone(), entry);
    }
}

fn entry_path(dir: &Path, url: &str) -> PathBuf {
    let name: String = url
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    dir.join(format!("{name}.json"))
}

/// `None` for a missing file, another format version, or a file written for a
/// different URL that maps to the same name.
fn load_entry(path: &Path, url: &str) -> Option<CachedBody> {
    let raw = fs::read_to_string(path).ok()?;
    let entry = serde_json::from_str::<CachedBody>(&raw).ok()?;
    (entry.version == CACHE_VERSION && entry.url == url).then_some(entry)
}

fn save_entry(path: &Path, entry: &CachedBody) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("create cache dir")?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(entry).context("serialize cached response")?;
    fs::write(&tmp, json).context("write cached response")?;
    fs::rename(&tmp, path).context("swap cached response")?;
    Ok(())
}

fn cache_dir_from(xdg_cache_home: Option<&str>, home: Option<&str>) -> Option<PathBuf> {
    if let Some(base) = xdg_cache_home.filter(|b| !b.trim().is_empty()) {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = home.filter(|h| !h.trim().is_empty())?;
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}
