//! Configuration handling for the app
//!
//! Settings come from `config.json` in the platform config directory, then
//! `FACTFIND_*` environment variables override individual fields.

use crate::backend::{DEFAULT_ADDRESS, DEFAULT_TIMEOUT};
use crate::questionnaire::DEFAULT_DRAFT_KEY;
use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const ENV_BACKEND_URL: &str = "FACTFIND_BACKEND_URL";
pub const ENV_API_KEY: &str = "FACTFIND_API_KEY";
pub const ENV_WEBHOOK_URL: &str = "FACTFIND_WEBHOOK_URL";
pub const ENV_BLOG_DIR: &str = "FACTFIND_BLOG_DIR";

const DEFAULT_AUTOSAVE_SECS: u64 = 30;
const DEFAULT_TIMEOUT_SECS: u64 = DEFAULT_TIMEOUT.as_secs();

/// Platform directories for config, drafts and logs
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("nz", "factfind", "factfind-tui")
}

/// User configuration for the app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the lead backend's REST surface
    pub backend_url: String,
    /// Backend API key, sent as `apikey` and bearer token
    pub api_key: Option<String>,
    /// Lead webhook; disabled when unset
    pub webhook_url: Option<String>,
    /// Directory of blog markdown files
    pub blog_dir: Option<PathBuf>,
    /// Storage key of the questionnaire draft
    pub draft_key: String,
    pub autosave_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_ADDRESS.to_string(),
            api_key: None,
            webhook_url: None,
            blog_dir: None,
            draft_key: DEFAULT_DRAFT_KEY.to_string(),
            autosave_interval_secs: DEFAULT_AUTOSAVE_SECS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load from the default location and apply environment overrides.
    /// A default file is written on first run so there is something to edit.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if !path.exists() => {
                let config = Self::default();
                if let Err(e) = config.save_to(&path) {
                    warn!("Could not write default config to {}: {e}", path.display());
                }
                config
            }
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Override fields from `lookup` (the process environment in production).
    /// Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_BACKEND_URL) {
            self.backend_url = url;
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(url) = get(ENV_WEBHOOK_URL) {
            self.webhook_url = Some(url);
        }
        if let Some(dir) = get(ENV_BLOG_DIR) {
            self.blog_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Blog directory, defaulting to `blog/` under the data directory
    pub fn resolved_blog_dir(&self) -> PathBuf {
        self.blog_dir.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join("blog"))
                .unwrap_or_else(|| PathBuf::from("blog"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.backend_url, DEFAULT_ADDRESS);
        assert!(config.api_key.is_none());
        assert!(config.webhook_url.is_none());
        assert_eq!(config.draft_key, "fact-find");
        assert_eq!(config.autosave_interval(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_deserialize_partial_json_keeps_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"backend_url": "https://api.example.nz", "extra": 1}"#)
                .unwrap();
        assert_eq!(parsed.backend_url, "https://api.example.nz");
        assert_eq!(parsed.autosave_interval_secs, 30);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            webhook_url: Some("https://hooks.example.nz/lead".to_string()),
            autosave_interval_secs: 10,
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ nope").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BACKEND_URL, "https://api.example.nz/rest/v1"),
            (ENV_API_KEY, "secret"),
            (ENV_WEBHOOK_URL, "   "),
            (ENV_BLOG_DIR, "/srv/blog"),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend_url, "https://api.example.nz/rest/v1");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        // Blank values do not override
        assert!(config.webhook_url.is_none());
        assert_eq!(config.resolved_blog_dir(), PathBuf::from("/srv/blog"));
    }

    #[test]
    fn test_zero_durations_are_clamped() {
        let config = AppConfig {
            autosave_interval_secs: 0,
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.autosave_interval(), Duration::from_secs(1));
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }
}
