use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::api::DEFAULT_BASE_URL;

pub const API_URL_ENV: &str = "SUPPORT_CHAT_API_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Base URL for the backend: environment variable first, then the
    /// config file, then the localhost default.
    pub fn api_base_url(&self) -> String {
        resolve_base_url(std::env::var(API_URL_ENV).ok(), self)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("support-chat").join("config.json"))
    }

    /// Directory for the diagnostic log file, next to the config.
    pub fn log_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .or_else(dirs::config_dir)
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(data_dir.join("support-chat"))
    }
}

fn resolve_base_url(env_value: Option<String>, config: &Config) -> String {
    env_value
        .filter(|url| !url.trim().is_empty())
        .or_else(|| config.api_base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}
