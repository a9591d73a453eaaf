// Configuration for the LinguaLeo client.
// Defaults match the public service; a JSON file in the home directory and
// `LEO_*` environment variables can override any of them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the optional config file looked up in the user's home directory.
pub const CONFIG_FILE_NAME: &str = ".leo_import.json";

/// Source and target language of the lookups.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LangPair {
    pub source: String,
    pub target: String,
}

impl Default for LangPair {
    fn default() -> Self {
        LangPair {
            source: "en".into(),
            target: "ru".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Login endpoint. It lives on the main site, not on the API host.
    pub auth_url: String,
    /// Base URL for every other endpoint (`/GetWordSets`, `/gettranslates`...).
    pub api_url: String,
    /// Sent as `Referer` on the login request.
    pub referer: String,
    pub api_version: String,
    /// Opaque `userId` field the add-word endpoint expects.
    pub user_id: String,
    pub lang_pair: LangPair,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            auth_url: "https://lingualeo.com/api/auth".into(),
            api_url: "https://api.lingualeo.com".into(),
            referer: "https://lingualeo.com/ru/".into(),
            api_version: "1.0.0".into(),
            user_id: "and-1".into(),
            lang_pair: LangPair::default(),
            timeout_seconds: 30,
        }
    }
}

impl Config {
    /// Defaults, then `~/.leo_import.json` if present, then the environment.
    pub fn load() -> Result<Self> {
        let mut config = match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Config::default(),
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Read a (possibly partial) config file; missing fields keep defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Parsing config file {}", path.display()))
    }

    /// Override fields from `LEO_*` variables. The lookup is injected so
    /// tests don't have to touch the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LEO_AUTH_URL") {
            self.auth_url = v;
        }
        if let Some(v) = lookup("LEO_API_URL") {
            self.api_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("LEO_REFERER") {
            self.referer = v;
        }
        if let Some(v) = lookup("LEO_API_VERSION") {
            self.api_version = v;
        }
        if let Some(v) = lookup("LEO_USER_ID") {
            self.user_id = v;
        }
        if let Some(v) = lookup("LEO_SOURCE_LANG") {
            self.lang_pair.source = v;
        }
        if let Some(v) = lookup("LEO_TARGET_LANG") {
            self.lang_pair.target = v;
        }
        if let Some(v) = lookup("LEO_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
            self.timeout_seconds = v;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Full URL of an API endpoint, e.g. `endpoint("GetWordSets")`.
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.api_url, name)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
