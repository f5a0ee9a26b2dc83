use std::path::Path;

use anyhow::{Context, anyhow};
use serde::Deserialize;
use tracing::warn;

use crate::service::AttemptPolicy;

type Result<T> = anyhow::Result<T>;

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Overridden by the `DATABASE_URL` environment variable.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,
    /// Rows returned by `/api/scoreboard` when no `limit` is given.
    #[serde(default)]
    pub scoreboard_limit: Option<usize>,
    #[serde(default)]
    pub attempt_policy: Option<AttemptPolicyConfig>,
    #[serde(default)]
    pub admins: Vec<AdminSeed>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct AttemptPolicyConfig {
    pub max_attempts: u32,
    pub window_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminSeed {
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Like [`Self::from_file`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Self::from_str("");
        }

        Self::from_file(path)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize server config")
    }

    pub fn database_url(&self) -> Result<String> {
        std::env::var("DATABASE_URL")
            .ok()
            .or_else(|| self.database_url.clone())
            .ok_or_else(|| anyhow!("DATABASE_URL is not set and config has no database_url"))
    }

    pub fn attempt_policy(&self) -> AttemptPolicy {
        match self.attempt_policy {
            Some(AttemptPolicyConfig {
                max_attempts,
                window_secs,
            }) => AttemptPolicy::Limited {
                max_attempts,
                window_secs,
            },
            None => AttemptPolicy::Unlimited,
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_event_buffer_size() -> usize {
    1_000
}
