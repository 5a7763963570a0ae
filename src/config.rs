use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::hashtags::Platform;

/// One year.
const MAX_TTL_MINUTES: u64 = 365 * 24 * 60;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub hashtags: HashtagConfig,

    pub llm: LlmConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/socialmate.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 3000,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashtagConfig {
    /// Trends24 region slug used for X (e.g. "turkey", "united-states").
    pub x_region: String,

    /// Accept-Language sent to Trends24.
    pub x_accept_language: String,

    /// Per-request timeout for Trends24.
    pub trends_timeout_seconds: u64,

    /// Per-request timeout for third-party listing sites.
    pub listing_timeout_seconds: u64,

    /// Cache lifetime per platform, in minutes.
    /// Keyed by platform identifier ("x", "instagram", ...).
    pub ttl_minutes: BTreeMap<String, u64>,

    /// Lifetime for platforms missing from `ttl_minutes`.
    pub default_ttl_minutes: u64,

    /// Replace a shuffled static list with an AI-generated one.
    pub escalate_static_to_ai: bool,
}

impl Default for HashtagConfig {
    fn default() -> Self {
        let ttl_minutes = [
            (Platform::X, 60),
            (Platform::Instagram, 120),
            (Platform::LinkedIn, 120),
            (Platform::TikTok, 120),
        ]
        .into_iter()
        .map(|(p, minutes)| (p.as_str().to_string(), minutes))
        .collect();

        Self {
            x_region: "turkey".to_string(),
            x_accept_language: "tr-TR,tr;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            trends_timeout_seconds: 10,
            listing_timeout_seconds: 8,
            ttl_minutes,
            default_ttl_minutes: 6 * 60,
            escalate_static_to_ai: true,
        }
    }
}

impl HashtagConfig {
    #[must_use]
    pub const fn trends_timeout(&self) -> Duration {
        Duration::from_secs(self.trends_timeout_seconds)
    }

    #[must_use]
    pub const fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_seconds)
    }

    #[must_use]
    pub fn ttl_for(&self, platform: Platform) -> Duration {
        let minutes = self
            .ttl_minutes
            .get(platform.as_str())
            .copied()
            .unwrap_or(self.default_ttl_minutes);
        Duration::from_secs(minutes.saturating_mul(60))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,

    /// Overridden by the `OPENAI_API_KEY` environment variable when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    pub chat_model: String,

    pub hashtag_model: String,

    pub chat_temperature: f32,

    pub hashtag_temperature: f32,

    pub hashtag_max_tokens: u32,

    pub request_timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            chat_model: "gpt-4".to_string(),
            hashtag_model: "gpt-4o-mini".to_string(),
            chat_temperature: 0.8,
            hashtag_temperature: 0.7,
            hashtag_max_tokens: 200,
            request_timeout_seconds: 30,
        }
    }
}

impl LlmConfig {
    /// Configured key, with the environment taking precedence.
    #[must_use]
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("socialmate").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".socialmate").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.enabled && self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if self.hashtags.trends_timeout_seconds == 0 || self.hashtags.listing_timeout_seconds == 0
        {
            anyhow::bail!("Hashtag source timeouts must be > 0");
        }

        if self.llm.base_url.trim().is_empty() {
            anyhow::bail!("LLM base URL cannot be empty");
        }

        let ttls = self
            .hashtags
            .ttl_minutes
            .values()
            .chain(std::iter::once(&self.hashtags.default_ttl_minutes));
        for &minutes in ttls {
            if minutes == 0 || minutes > MAX_TTL_MINUTES {
                anyhow::bail!("Hashtag TTL must be between 1 and {MAX_TTL_MINUTES} minutes");
            }
        }

        if self.llm.request_timeout_seconds == 0 {
            anyhow::bail!("LLM request timeout must be > 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.hashtags.ttl_for(Platform::X), Duration::from_secs(3600));
        assert_eq!(
            config.hashtags.ttl_for(Platform::TikTok),
            Duration::from_secs(7200)
        );
        assert_eq!(config.hashtags.default_ttl_minutes, 360);
        assert_eq!(config.hashtags.listing_timeout(), Duration::from_secs(8));
        assert!(config.hashtags.escalate_static_to_ai);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[hashtags]"));
        assert!(toml_str.contains("[hashtags.ttl_minutes]"));
        assert!(toml_str.contains("[llm]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [hashtags]
            x_region = "united-states"

            [hashtags.ttl_minutes]
            x = 15
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.hashtags.x_region, "united-states");
        assert_eq!(config.hashtags.ttl_for(Platform::X), Duration::from_secs(15 * 60));
        // A table given in the file replaces the defaults entirely.
        assert_eq!(
            config.hashtags.ttl_for(Platform::Instagram),
            Duration::from_secs(6 * 3600)
        );
        assert_eq!(config.llm.hashtag_model, "gpt-4o-mini");
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let mut config = Config::default();
        config.hashtags.ttl_minutes.insert("x".to_string(), u64::MAX);
        assert_eq!(
            config.hashtags.ttl_for(Platform::X),
            Duration::from_secs(u64::MAX)
        );
        assert!(config.validate().is_err());

        config.hashtags.ttl_minutes.insert("x".to_string(), 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_timeouts() {
        let mut config = Config::default();
        config.hashtags.listing_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
