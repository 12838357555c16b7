//! Configuration module for Watchpost.
//!
//! Process settings come from environment variables with sensible
//! defaults; the monitored sites come from a YAML file.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Process-level settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to the site configuration file (default: "watchpost.yml")
    pub config_path: PathBuf,
    /// Directory holding per-site history files (default: "history")
    pub history_dir: PathBuf,
    /// Directory the summary artifact is written to (default: "api")
    pub api_dir: PathBuf,
    /// Lock file guarding against overlapping runs (default: "watchpost.lock")
    pub lock_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("watchpost.yml"),
            history_dir: PathBuf::from("history"),
            api_dir: PathBuf::from("api"),
            lock_path: PathBuf::from("watchpost.lock"),
        }
    }
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// Environment variables:
    /// - `WATCHPOST_CONFIG`: site configuration file (default: "watchpost.yml")
    /// - `WATCHPOST_HISTORY_DIR`: history directory (default: "history")
    /// - `WATCHPOST_API_DIR`: summary output directory (default: "api")
    /// - `WATCHPOST_LOCK_PATH`: run lock file (default: "watchpost.lock")
    pub fn load() -> Self {
        let mut settings = Self::default();

        if let Ok(path) = env::var("WATCHPOST_CONFIG") {
            settings.config_path = PathBuf::from(path);
        }
        if let Ok(dir) = env::var("WATCHPOST_HISTORY_DIR") {
            settings.history_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("WATCHPOST_API_DIR") {
            settings.api_dir = PathBuf::from(dir);
        }
        if let Ok(path) = env::var("WATCHPOST_LOCK_PATH") {
            settings.lock_path = PathBuf::from(path);
        }

        settings
    }
}

/// Status codes counted as healthy when a site does not configure its own.
fn default_expected_codes() -> Vec<u16> {
    vec![200, 201, 204, 301, 302]
}

/// A monitored site.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub name: String,
    pub url: String,
    #[serde(default = "default_expected_codes")]
    pub expected_status_codes: Vec<u16>,
}

impl Endpoint {
    /// Key under which this site's history is stored.
    pub fn storage_key(&self) -> String {
        storage_key(&self.name)
    }

    /// Whether a response status code counts as healthy for this site.
    pub fn accepts(&self, code: u16) -> bool {
        self.expected_status_codes.contains(&code)
    }
}

/// Derive a storage key from a site name: lowercase, with every run of
/// non-alphanumeric characters collapsed into a single dash.
pub fn storage_key(name: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new("[^a-z0-9]+").expect("valid pattern"));
    re.replace_all(&name.to_lowercase(), "-").into_owned()
}

/// The ordered list of monitored sites.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sites: Vec<Endpoint>,
}

impl Config {
    /// Load site configuration from a YAML file.
    ///
    /// A missing or malformed file is an error; an explicitly empty
    /// `sites` list is valid and yields an empty run.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.config_path, PathBuf::from("watchpost.yml"));
        assert_eq!(settings.history_dir, PathBuf::from("history"));
        assert_eq!(settings.api_dir, PathBuf::from("api"));
    }

    #[test]
    fn test_storage_key() {
        assert_eq!(storage_key("API"), "api");
        assert_eq!(storage_key("Auth Service"), "auth-service");
        assert_eq!(storage_key("EU (west) #2"), "eu-west-2");
    }

    #[test]
    fn test_parse_config() {
        let raw = "sites:\n  - name: API\n    url: https://api.example.com/health\n  - name: Dashboard\n    url: https://app.example.com\n    expectedStatusCodes: [200, 401]\n";
        let config: Config = serde_yaml::from_str(raw).unwrap();

        assert_eq!(config.sites.len(), 2);
        assert_eq!(config.sites[0].name, "API");
        assert_eq!(config.sites[0].expected_status_codes, vec![200, 201, 204, 301, 302]);
        assert_eq!(config.sites[1].expected_status_codes, vec![200, 401]);
    }

    #[test]
    fn test_parse_empty_sites() {
        let config: Config = serde_yaml::from_str("sites: []").unwrap();
        assert!(config.sites.is_empty());
    }

    #[test]
    fn test_accepts() {
        let site = Endpoint {
            name: "API".to_string(),
            url: "https://api.example.com".to_string(),
            expected_status_codes: default_expected_codes(),
        };
        assert!(site.accepts(200));
        assert!(site.accepts(301));
        assert!(!site.accepts(500));
        assert!(!site.accepts(0));
    }
}
