use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::feed::{CLASSICAL_MPR_PLAYLIST_URL, CLASSICAL_MPR_STREAM_URL};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds between fetch ticks.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Stream address that triggers the playlist enrichment (exact match).
    #[serde(default = "default_stream_url")]
    pub stream_url: String,
    /// Playlist feed endpoint.
    #[serde(default = "default_playlist_url")]
    pub playlist_url: String,
    /// HTTP timeout for the feed fetch. Kept well under the tick period so a
    /// hung fetch cannot pile up behind the next tick.
    #[serde(default = "default_feed_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            stream_url: default_stream_url(),
            playlist_url: default_playlist_url(),
            timeout_secs: default_feed_timeout_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    5
}

fn default_stream_url() -> String {
    CLASSICAL_MPR_STREAM_URL.to_string()
}

fn default_playlist_url() -> String {
    CLASSICAL_MPR_PLAYLIST_URL.to_string()
}

fn default_feed_timeout_secs() -> u64 {
    3
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nowplay")
            .join("config.toml")
    }

    /// Where the widget writes its log and scratch files.
    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("nowplay")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            polling: PollingConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}
