//! # Configuration
//!
//! One TOML file (default `config.toml`) split into four sections:
//!
//! - [`BotConfig`] - bot name, command prefix, admin list, interactive flow timeout
//! - [`StorageConfig`] - data directory, record backend, optional catalog override
//! - [`LoggingConfig`] - log level and optional log files
//! - [`GameRules`] - every tunable number of the game itself
//!
//! ```toml
//! [bot]
//! name = "Shinobi Bot"
//! command_prefix = "!"
//! admin_ids = ["123456789"]
//! flow_timeout_secs = 60
//!
//! [storage]
//! data_dir = "./data"
//! backend = "sled"
//!
//! [logging]
//! level = "info"
//! file = "shinobibot.log"
//!
//! [game]
//! starting_ryo = 1000
//! reroll_cost = 500
//! ```
//!
//! Precedence: CLI args > config file > defaults.

use anyhow::{anyhow, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::game::rules::GameRules;

/// Command prefixes the bot will accept. Anything else falls back to [`DEFAULT_PREFIX`].
pub const ALLOWED_PREFIXES: &[&str] = &["!", "^", "+", "$", "/", ">", "?"];
pub const DEFAULT_PREFIX: &str = "!";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub name: String,
    /// Must be one of [`ALLOWED_PREFIXES`]. If unset or invalid, defaults to "!".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_prefix: Option<String>,
    /// Platform user ids allowed to run admin commands.
    #[serde(default)]
    pub admin_ids: Vec<String>,
    /// Seconds each step of the interactive `start` flow waits for an answer.
    #[serde(default = "default_flow_timeout")]
    pub flow_timeout_secs: u64,
}

fn default_flow_timeout() -> u64 {
    60
}

impl BotConfig {
    /// The configured prefix if it is in the allowed set, else `!`.
    pub fn prefix(&self) -> &str {
        match self.command_prefix.as_deref().map(str::trim) {
            Some(p) if ALLOWED_PREFIXES.contains(&p) => p,
            Some(other) => {
                warn!(
                    "Invalid command_prefix '{}', falling back to '{}'",
                    other, DEFAULT_PREFIX
                );
                DEFAULT_PREFIX
            }
            None => DEFAULT_PREFIX,
        }
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_ids.iter().any(|id| id == user_id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sled,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    #[serde(default)]
    pub backend: StorageBackend,
    /// JSON file whose sections replace the built-in clans, missions, shop or jutsu pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<String>,
}

impl StorageConfig {
    /// Where the sled database lives.
    pub fn sled_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("players.db")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    #[serde(default)]
    pub security_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub game: GameRules,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        Self::from_toml(&content).map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the game cannot run with. Unknown prefixes are not an error.
    pub fn validate(&self) -> Result<()> {
        if self.bot.flow_timeout_secs == 0 {
            return Err(anyhow!("bot.flow_timeout_secs must be at least 1"));
        }
        let threshold = self.game.mission_failure_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(anyhow!(
                "game.mission_failure_threshold must be within [0, 1], got {}",
                threshold
            ));
        }
        if self.game.daily_cooldown_hours < 0 {
            return Err(anyhow!("game.daily_cooldown_hours cannot be negative"));
        }
        Ok(())
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bot: BotConfig {
                name: "Shinobi Bot".to_string(),
                command_prefix: Some(DEFAULT_PREFIX.to_string()),
                admin_ids: Vec::new(),
                flow_timeout_secs: default_flow_timeout(),
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
                backend: StorageBackend::Sled,
                catalog_file: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("shinobibot.log".to_string()),
                security_file: Some("shinobibot-security.log".to_string()),
            },
            game: GameRules::default(),
        }
    }
}
