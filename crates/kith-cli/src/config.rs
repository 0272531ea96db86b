//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Get default config file path
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kith")
        .join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lower-case usernames typed at the prompt
    pub normalize_case: bool,
    /// Prompt shown by the interactive session
    pub prompt: String,
    /// Posts shown by `output_posts` when no count is given
    pub default_post_limit: usize,
    /// Suggestions shown by `suggest_friends` when no count is given
    pub default_suggestion_limit: usize,
    /// Output format: text, json
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            normalize_case: true,
            prompt: "Write your command here: ".to_string(),
            default_post_limit: 10,
            default_suggestion_limit: 5,
            format: "text".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is missing
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Write to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &[
            "normalize_case",
            "prompt",
            "default_post_limit",
            "default_suggestion_limit",
            "format",
        ]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "normalize_case" => Some(self.normalize_case.to_string()),
            "prompt" => Some(self.prompt.clone()),
            "default_post_limit" => Some(self.default_post_limit.to_string()),
            "default_suggestion_limit" => Some(self.default_suggestion_limit.to_string()),
            "format" => Some(self.format.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "normalize_case" => {
                self.normalize_case = value
                    .parse()
                    .with_context(|| format!("Expected true or false, got '{}'", value))?;
            }
            "prompt" => self.prompt = value.to_string(),
            "default_post_limit" => {
                self.default_post_limit = value
                    .parse()
                    .with_context(|| format!("Expected a number, got '{}'", value))?;
            }
            "default_suggestion_limit" => {
                self.default_suggestion_limit = value
                    .parse()
                    .with_context(|| format!("Expected a number, got '{}'", value))?;
            }
            "format" => match value {
                "text" | "json" => self.format = value.to_string(),
                _ => anyhow::bail!("Unknown format '{}' (expected text or json)", value),
            },
            _ => anyhow::bail!(
                "Unknown config key: {} (available: {})",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }
}
