//! # Configuration
//!
//! Manages the loading and parsing of the bot's configuration file
//! (`data/config.yaml`). Defines the structs for transport credentials,
//! rate limiting, XP progression and storage locations.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::domain::types::UserId;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub bot: BotConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub xp: XpConfig,
    #[serde(default)]
    pub cups: CupsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Transport credentials and routing targets.
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    pub token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    pub owner_id: UserId,
    /// Chat that receives forwarded applications for review.
    #[serde(default)]
    pub review_chat_id: Option<String>,
}

fn default_api_url() -> String {
    "https://botapi.rubika.ir/v3".to_string()
}

/// Per-actor throttle for free-text submissions.
#[derive(Debug, Deserialize, Clone)]
pub struct SecurityConfig {
    #[serde(default = "default_rate_interval")]
    pub rate_limit_interval: f64,
    #[serde(default = "default_rate_burst")]
    pub rate_limit_burst: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            rate_limit_interval: default_rate_interval(),
            rate_limit_burst: default_rate_burst(),
        }
    }
}

fn default_rate_interval() -> f64 {
    10.0
}

fn default_rate_burst() -> u32 {
    5
}

/// XP awarding knobs for group activity.
#[derive(Debug, Deserialize, Clone)]
pub struct XpConfig {
    #[serde(default = "default_xp_per_character")]
    pub message_character_reward: f64,
    #[serde(default = "default_xp_message_limit")]
    pub message_reward_limit: i64,
    #[serde(default = "default_xp_message_cooldown")]
    pub message_reward_cooldown: f64,
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
    #[serde(default = "default_milestone_interval")]
    pub milestone_interval: i64,
    #[serde(default = "default_notification_cooldown")]
    pub notification_cooldown: f64,
}

impl Default for XpConfig {
    fn default() -> Self {
        Self {
            message_character_reward: default_xp_per_character(),
            message_reward_limit: default_xp_message_limit(),
            message_reward_cooldown: default_xp_message_cooldown(),
            leaderboard_size: default_leaderboard_size(),
            milestone_interval: default_milestone_interval(),
            notification_cooldown: default_notification_cooldown(),
        }
    }
}

fn default_xp_per_character() -> f64 {
    0.5
}

fn default_xp_message_limit() -> i64 {
    25
}

fn default_xp_message_cooldown() -> f64 {
    20.0
}

fn default_leaderboard_size() -> usize {
    10
}

fn default_milestone_interval() -> i64 {
    5
}

fn default_notification_cooldown() -> f64 {
    180.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct CupsConfig {
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
}

impl Default for CupsConfig {
    fn default() -> Self {
        Self {
            leaderboard_size: default_leaderboard_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,
    #[serde(default)]
    pub backup_path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            backup_path: None,
        }
    }
}

fn default_storage_path() -> String {
    "data/storage.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let yaml = r#"
bot:
  token: "abc"
  owner_id: 1
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).expect("minimal config parses");
        assert_eq!(config.bot.owner_id, 1);
        assert_eq!(config.security.rate_limit_burst, 5);
        assert_eq!(config.xp.message_reward_limit, 25);
        assert!(config.bot.review_chat_id.is_none());
        assert_eq!(config.storage.path, "data/storage.json");
    }
}
