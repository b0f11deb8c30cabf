//! Configuration handling

use crate::api::DEFAULT_ADDRESS;
use crate::i18n::DEFAULT_LOCALE;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the configured API address
pub const API_URL_ENV: &str = "ORGDESK_API_URL";

const DEFAULT_TOAST_SECONDS: i64 = 4;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// API address
    pub api_url: Option<String>,
    /// How long a toast stays on the status line
    pub toast_seconds: Option<i64>,
    /// Keep unfinished forms as drafts for the session
    pub drafts_enabled: Option<bool>,
    /// Language for messages (`en`, `nl`)
    pub language: Option<String>,
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "orgdesk", "orgdesk")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config = config.with_api_url_override(Some(url));
        }
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: AppConfig = serde_json::from_str(&content)?;
                tracing::debug!("Loaded config from {}", path.display());
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    fn with_api_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api_url = Some(url);
        }
        self
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_ADDRESS)
    }

    pub fn toast_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.toast_seconds.unwrap_or(DEFAULT_TOAST_SECONDS).max(1))
    }

    pub fn drafts_enabled(&self) -> bool {
        self.drafts_enabled.unwrap_or(true)
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LOCALE)
    }
}
