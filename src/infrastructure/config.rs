use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding `store.url`.
pub const STORE_URL_ENV: &str = "QUOTE_WIZARD_STORE_URL";
/// Environment variable overriding `store.anon_key`.
pub const STORE_KEY_ENV: &str = "QUOTE_WIZARD_STORE_KEY";

const APP_DIR: &str = "quote-wizard";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub tui: TuiConfig,
}

/// Connection settings for the hosted quote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://example.supabase.co`.
    pub url: Option<String>,
    /// Public (anon) API key.
    pub anon_key: Option<String>,
    /// Transport timeout for each request, in seconds.
    pub timeout_secs: u64,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            timeout_secs: 30,
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 100 }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("quote store URL is not configured (set store.url or QUOTE_WIZARD_STORE_URL)")]
    MissingUrl,
    #[error("quote store key is not configured (set store.anon_key or QUOTE_WIZARD_STORE_KEY)")]
    MissingKey,
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl StoreConfig {
    /// Returns the URL and key, or which of them is missing.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        let url = self
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::MissingUrl)?;
        let key = self
            .anon_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingKey)?;
        Ok((url, key))
    }
}

impl AppConfig {
    /// Loads `~/.config/quote-wizard/config.toml` and applies environment
    /// overrides.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path()).with_env(|name| std::env::var(name).ok())
    }

    /// Loads configuration from `path`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Overrides store settings from environment variables resolved by
    /// `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(STORE_URL_ENV) {
            self.store.url = Some(url);
        }
        if let Some(key) = lookup(STORE_KEY_ENV) {
            self.store.anon_key = Some(key);
        }
        self
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Directory for the log file.
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}
