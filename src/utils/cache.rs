//! Cookie and firehose-token persistence
//!
//! Small JSON files under the user cache directory: a `host -> token`
//! map for firehose tokens, plus helpers for loading a session cookie
//! map from a file or parsing one out of a browser cookie header.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Error, Result};

/// Per-host firehose token cache backed by a JSON file
#[derive(Debug)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Create a cache backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache file under the platform cache directory
    pub fn at_default_location() -> Result<Self> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| Error::config("could not determine the user cache directory"))?
            .join("pollev-bot");
        Ok(Self::new(dir.join("firehose_tokens.json")))
    }

    /// Load the full cache map. Unreadable or malformed files are logged
    /// and treated as empty; non-string entries are dropped.
    pub fn load(&self) -> HashMap<String, String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                warn!("could not read firehose token cache ({e}); starting empty");
                return HashMap::new();
            }
        };
        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!("firehose token cache was not valid JSON ({e}); starting empty");
                return HashMap::new();
            }
        };
        let Some(map) = value.as_object() else {
            warn!("firehose token cache format was unexpected; ignoring it");
            return HashMap::new();
        };
        let mut cache = HashMap::new();
        for (host, token) in map {
            match token.as_str() {
                Some(token) => {
                    cache.insert(host.clone(), token.to_string());
                }
                None => warn!("ignoring non-string token cache entry for '{host}'"),
            }
        }
        cache
    }

    /// Cached token for a host, if any
    pub fn get(&self, host: &str) -> Option<String> {
        self.load().remove(host)
    }

    /// Store a token for a host, creating the cache file as needed
    pub fn insert(&self, host: &str, token: &str) -> Result<()> {
        let mut cache = self.load();
        cache.insert(host.to_string(), token.to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&cache)?)?;
        Ok(())
    }
}

/// Load a session cookie map from a JSON file
pub fn load_cookie_file(path: &Path) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Parse a browser-style cookie header (`name=value; name2=value2`) into
/// a cookie map. Segments without an `=` are skipped.
pub fn parse_cookie_string(raw: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for segment in raw.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        if let Some((name, value)) = segment.split_once('=') {
            cookies.insert(name.trim().to_string(), value.trim().to_string());
        }
    }
    cookies
}
