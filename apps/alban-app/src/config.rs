//! # Application Configuration
//!
//! Where files live and how invoices are labelled.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ALBAN_DATA_DIR=/srv/alban                                          │
//! │     ALBAN_CURRENCY=MAD                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/albanmanage/alban.toml (Linux)                           │
//! │     ~/Library/Application Support/com.albanmanage.AlbanManage/...      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     platform data dir, "MAD", "AlbanManage Invoice"                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # alban.toml
//! data_dir = "/home/me/.local/share/albanmanage"
//! documents_dir = "/home/me/Documents/AlbanManage"   # optional
//! database_path = "/home/me/.local/share/albanmanage/alban.db"   # optional
//! currency_label = "MAD"
//! invoice_title = "AlbanManage Invoice"
//! footer_caption = "Generated by AlbanManage"
//! action_label = "PDF Generated"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use alban_core::invoice::{LayoutConfig, DEFAULT_FOOTER_CAPTION, DEFAULT_INVOICE_TITLE};
use alban_core::{DEFAULT_ACTION_LABEL, DEFAULT_CURRENCY_LABEL};

use crate::error::{ConfigError, ConfigResult};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "alban.toml";

const DATABASE_FILE_NAME: &str = "alban.db";
const DOCUMENTS_DIR_NAME: &str = "documents";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base directory for the database and, by default, documents.
    pub data_dir: PathBuf,

    /// Where generated PDFs are stored. Default: `<data_dir>/documents`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_dir: Option<PathBuf>,

    /// SQLite file. Default: `<data_dir>/alban.db`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Printed after every amount on the invoice.
    pub currency_label: String,

    /// Heading of the invoice; also the prefix of stored file names.
    pub invoice_title: String,

    pub footer_caption: String,

    /// `action_type` written to history.
    pub action_label: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: default_data_dir(),
            documents_dir: None,
            database_path: None,
            currency_label: DEFAULT_CURRENCY_LABEL.to_string(),
            invoice_title: DEFAULT_INVOICE_TITLE.to_string(),
            footer_caption: DEFAULT_FOOTER_CAPTION.to_string(),
            action_label: DEFAULT_ACTION_LABEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Default configuration rooted at `data_dir`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        AppConfig {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`alban.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }

        if self.invoice_title.trim().is_empty() {
            return Err(ConfigError::Invalid("invoice_title must not be empty".into()));
        }

        if self.action_label.trim().is_empty() {
            return Err(ConfigError::Invalid("action_label must not be empty".into()));
        }

        if self.database_path() == self.documents_dir() {
            return Err(ConfigError::Invalid(
                "database_path and documents_dir must differ".into(),
            ));
        }

        Ok(())
    }

    /// Resolved documents directory.
    pub fn documents_dir(&self) -> PathBuf {
        self.documents_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DOCUMENTS_DIR_NAME))
    }

    /// Resolved database file.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DATABASE_FILE_NAME))
    }

    /// Invoice layout with this configuration's labels.
    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig::default()
            .with_currency_label(&self.currency_label)
            .with_footer_caption(&self.footer_caption)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `ALBAN_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("ALBAN_DATA_DIR") {
            debug!(data_dir = %dir, "Overriding data dir from environment");
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(dir) = lookup("ALBAN_DOCUMENTS_DIR") {
            self.documents_dir = Some(PathBuf::from(dir));
        }

        if let Some(path) = lookup("ALBAN_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(label) = lookup("ALBAN_CURRENCY") {
            self.currency_label = label;
        }

        if let Some(title) = lookup("ALBAN_INVOICE_TITLE") {
            self.invoice_title = title;
        }

        if let Some(caption) = lookup("ALBAN_FOOTER_CAPTION") {
            self.footer_caption = caption;
        }

        if let Some(label) = lookup("ALBAN_ACTION_LABEL") {
            self.action_label = label;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "albanmanage", "AlbanManage")
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| Path::new(".").join("albanmanage-data"))
}
