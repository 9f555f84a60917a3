use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::money::Currency;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    #[serde(default)]
    pub rotation: LogRotation,
    pub gateway: GatewayConfig,
    /// PostgreSQL connection URL; overridden by `DATABASE_URL`
    #[serde(default)]
    pub postgres_url: Option<String>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    /// HS256 secret for bearer tokens; overridden by `JWT_SECRET`
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// Currency of newly created wallets
    #[serde(default)]
    pub default_currency: Currency,
}

/// Log file rollover period
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
    pub idle_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            acquire_timeout_ms: 2_000,
            idle_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HistoryConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> anyhow::Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path))?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        if config.history.default_limit == 0 || config.history.max_limit < config.history.default_limit {
            anyhow::bail!(
                "history.default_limit must be in 1..={}",
                config.history.max_limit
            );
        }
        Ok(config)
    }

    /// Secrets and the database URL may come from the environment
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.postgres_url = Some(url);
        }
        if let Some(secret) = lookup("JWT_SECRET").filter(|v| !v.is_empty()) {
            self.jwt_secret = Some(secret);
        }
    }
}
