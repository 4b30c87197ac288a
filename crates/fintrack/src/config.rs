//! Configuration management for fintrack.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "fintrack";

/// Default workbook file name for the local backend.
const WORKBOOK_FILE_NAME: &str = "workbook.db";

/// Plain environment variables understood for compatibility with existing
/// deployments, and the configuration keys they feed.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("SHEET_ID", "sheets.spreadsheet_id"),
    ("GOOGLE_CLIENT_EMAIL", "sheets.client_email"),
    ("GOOGLE_PRIVATE_KEY", "sheets.private_key"),
];

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. `PORT`, `SHEET_ID`, `GOOGLE_CLIENT_EMAIL`, `GOOGLE_PRIVATE_KEY`
/// 2. Environment variables prefixed with `FINTRACK_`, nested with `__`
///    (e.g. `FINTRACK_SHEETS__DATABASE_PATH`)
/// 3. TOML config file at `~/.config/fintrack/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Spreadsheet backend configuration.
    pub sheets: SheetsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding the built single-page app. When set, non-API
    /// paths are served from here with `index.html` as the fallback.
    pub static_dir: Option<PathBuf>,
}

/// Which spreadsheet implementation backs the records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// A SQLite file laid out as sheets of rows.
    #[default]
    Local,
    /// A Google Sheets spreadsheet reached over the v4 REST API.
    Google,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Google => write!(f, "google"),
        }
    }
}

/// Spreadsheet backend configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Backend selection.
    pub backend: BackendKind,
    /// Path to the local workbook.
    /// Defaults to `~/.local/share/fintrack/workbook.db`
    pub database_path: Option<PathBuf>,
    /// Google spreadsheet id.
    pub spreadsheet_id: Option<String>,
    /// Service account e-mail.
    pub client_email: Option<String>,
    /// Service account PEM private key. Literal `\n` sequences are accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: None,
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
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let legacy = Env::raw()
            .only(&LEGACY_ENV_KEYS.iter().map(|(k, _)| *k).collect::<Vec<_>>())
            .map(|key| match LEGACY_ENV_KEYS.iter().find(|(name, _)| key == *name) {
                Some((_, target)) => (*target).into(),
                None => key.as_str().to_string().into(),
            });

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FINTRACK_").split("__"))
            .merge(legacy);

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
        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if self.server.host.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "server.host must not be empty".to_string(),
            });
        }

        if self.sheets.backend == BackendKind::Google {
            let required = [
                ("spreadsheet_id", &self.sheets.spreadsheet_id),
                ("client_email", &self.sheets.client_email),
                ("private_key", &self.sheets.private_key),
            ];
            for (name, value) in required {
                if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                    return Err(Error::ConfigValidation {
                        message: format!("sheets.{name} is required for the google backend"),
                    });
                }
            }
        }

        Ok(())
    }

    /// Get the workbook path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.sheets
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(WORKBOOK_FILE_NAME))
    }

    /// Get the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not a valid IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip = self
            .server
            .host
            .parse::<std::net::IpAddr>()
            .map_err(|_| Error::ConfigValidation {
                message: format!("invalid server.host: {}", self.server.host),
            })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}
