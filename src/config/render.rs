//! Render settings file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::core::BowserError;
use crate::templating::Directives;

/// Config file looked up in the current directory.
pub const PROJECT_CONFIG_FILE: &str = "bowser.toml";

/// Settings shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directive attribute names
    pub directives: Directives,
    pub output: OutputConfig,
}

/// Serializer settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent nested elements when writing HTML
    pub pretty: bool,
}

impl RenderConfig {
    /// Load configuration, honoring an explicit path when one is given.
    ///
    /// An explicit path must exist. Otherwise the project file and then the
    /// user file are tried, falling back to defaults when neither is present.
    ///
    /// # Errors
    ///
    /// Returns an error if a chosen file cannot be read or parsed, or if the
    /// loaded settings fail [`RenderConfig::validate`].
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(&path).await;
        }

        let mut candidates = vec![PathBuf::from(PROJECT_CONFIG_FILE)];
        if let Ok(user_path) = Self::default_path() {
            candidates.push(user_path);
        }

        for candidate in candidates {
            if candidate.exists() {
                return Self::load_from(&candidate).await;
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate a specific config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML for
    /// this schema, or fails validation.
    pub async fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(BowserError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Location of the per-user config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory is unknown.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("bowser")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".bowser")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Check that directive names are usable.
    ///
    /// # Errors
    ///
    /// Returns [`BowserError::ConfigError`] if either name is blank or both
    /// names are the same.
    pub fn validate(&self) -> Result<(), BowserError> {
        let Directives {
            condition,
            repeat,
        } = &self.directives;

        for (key, name) in [("directives.condition", condition), ("directives.repeat", repeat)] {
            if name.trim().is_empty() {
                return Err(BowserError::ConfigError {
                    message: format!("{key} must not be empty"),
                });
            }
            if name.chars().any(char::is_whitespace) {
                return Err(BowserError::ConfigError {
                    message: format!("{key} must be a single attribute name, got '{name}'"),
                });
            }
        }

        if condition == repeat {
            return Err(BowserError::ConfigError {
                message: format!("directives.condition and directives.repeat are both '{condition}'"),
            });
        }
        Ok(())
    }
}
