//! Configuration management for blooddonor.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "blooddonor";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "registry.db";

/// Built-in admin address used when the admin list was never initialized.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

/// Loose shape check for configured addresses.
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `BLOODDONOR_`)
/// 2. TOML config file at `~/.config/blooddonor/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Admin configuration.
    pub admin: AdminConfig,
    /// Outbound mail link configuration.
    pub mail: MailConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/blooddonor/registry.db`
    pub database_path: Option<PathBuf>,
}

/// Admin-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Admin emails used when the store holds no admin list.
    pub default_emails: Vec<String>,
}

/// Mail link text used by the donor search page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Subject line for emailing search matches.
    pub search_subject: String,
    /// Body text for emailing search matches.
    pub search_body: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            default_emails: vec![DEFAULT_ADMIN_EMAIL.to_string()],
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            search_subject: "Blood Donation Request".to_string(),
            search_body:
                "Dear donor, we are looking for blood donation. Please respond if available."
                    .to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `BLOODDONOR_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("BLOODDONOR_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.admin.default_emails.is_empty() {
            return Err(Error::ConfigValidation {
                message: "admin.default_emails must contain at least one address".to_string(),
            });
        }

        let pattern = Regex::new(EMAIL_PATTERN)
            .map_err(|e| Error::internal(format!("bad email pattern: {e}")))?;
        for email in &self.admin.default_emails {
            if !pattern.is_match(email.trim()) {
                return Err(Error::ConfigValidation {
                    message: format!("invalid admin email: {email}"),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}
