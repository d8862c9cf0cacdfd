//! Configuration management module
//!
//! Handles loading, validation, and management of application configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Logging level
    pub log_level: String,

    /// File-based logging configuration
    pub log: LogConfig,

    /// Backend REST API configuration
    pub backend: BackendConfig,

    /// Refresh scheduler configuration
    pub poll: PollConfig,

    /// UI-specific configuration
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// REST API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollConfig {
    /// Full table reload cadence in seconds (tracked list + prices)
    pub table_refresh_secs: u64,

    /// Price-only refresh cadence in seconds
    pub price_refresh_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// TUI render cadence in milliseconds
    pub refresh_rate_ms: u64,

    /// How many notice lines the notices panel keeps
    pub max_notices: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Absolute or relative path to the log file
    pub file_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log: LogConfig::default(),
            backend: BackendConfig::default(),
            poll: PollConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            table_refresh_secs: 5,
            price_refresh_secs: 9,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 100,
            max_notices: 50,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_path: "logs/bandwatch.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        // BANDWATCH_BACKEND_URL - REST API base URL
        if let Ok(base_url) = env::var("BANDWATCH_BACKEND_URL") {
            if !base_url.trim().is_empty() {
                self.backend.base_url = base_url;
            }
        }

        // BANDWATCH_BACKEND_TIMEOUT_SECONDS - request timeout
        if let Ok(timeout) = env::var("BANDWATCH_BACKEND_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.backend.timeout_seconds = value;
            }
        }

        // BANDWATCH_TABLE_REFRESH_SECS - full reload cadence
        if let Ok(secs) = env::var("BANDWATCH_TABLE_REFRESH_SECS") {
            if let Ok(value) = secs.parse::<u64>() {
                self.poll.table_refresh_secs = value;
            }
        }

        // BANDWATCH_PRICE_REFRESH_SECS - price-only cadence
        if let Ok(secs) = env::var("BANDWATCH_PRICE_REFRESH_SECS") {
            if let Ok(value) = secs.parse::<u64>() {
                self.poll.price_refresh_secs = value;
            }
        }

        // BANDWATCH_LOG_LEVEL - logging level
        if let Ok(log_level) = env::var("BANDWATCH_LOG_LEVEL") {
            self.log_level = log_level;
        }

        // BANDWATCH_LOG_FILE_PATH - logging destination file
        if let Ok(file_path) = env::var("BANDWATCH_LOG_FILE_PATH") {
            if !file_path.trim().is_empty() {
                self.log.file_path = file_path;
            }
        }

        // BANDWATCH_UI_REFRESH_RATE_MS - render cadence
        if let Ok(rate) = env::var("BANDWATCH_UI_REFRESH_RATE_MS") {
            if let Ok(value) = rate.parse::<u64>() {
                self.ui.refresh_rate_ms = value;
            }
        }
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load_from_file(path).unwrap_or_else(|err| {
            tracing::warn!("Failed to load config: {}, using defaults", err);
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.backend.base_url.trim().is_empty() {
            anyhow::bail!("Backend base URL must not be empty");
        }

        if self.backend.timeout_seconds == 0 {
            anyhow::bail!("Timeout must be greater than 0");
        }

        if self.poll.table_refresh_secs == 0 {
            anyhow::bail!("Table refresh cadence must be greater than 0");
        }

        if self.poll.price_refresh_secs == 0 {
            anyhow::bail!("Price refresh cadence must be greater than 0");
        }

        if self.ui.refresh_rate_ms == 0 {
            anyhow::bail!("UI refresh rate must be greater than 0");
        }

        if self.log.file_path.trim().is_empty() {
            anyhow::bail!("Log file path must not be empty");
        }

        Ok(())
    }

    /// Normalize a ticker the way the backend expects it
    pub fn normalize_ticker(ticker: &str) -> String {
        ticker.trim().to_uppercase()
    }

    /// Display formatted configuration
    pub fn display(&self) -> Result<()> {
        println!("Current configuration:");
        println!("{:#?}", self);
        Ok(())
    }

    /// Handle the `config` subcommand
    pub fn handle_command(config_file: &str, action: &Option<crate::cli::ConfigAction>) -> Result<()> {
        match action {
            Some(crate::cli::ConfigAction::Show) => {
                let config = Config::load_or_default(config_file);
                config.display()?;
            }
            Some(crate::cli::ConfigAction::Reset) => {
                let default_config = Config::default();
                default_config.save_to_file(config_file)?;
                println!("Configuration reset to defaults: {}", config_file);
            }
            None => {
                println!("Configuration management commands:");
                println!("  bandwatch config show   - Show current configuration");
                println!("  bandwatch config reset  - Reset to default configuration");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll.table_refresh_secs, 5);
        assert_eq!(config.poll.price_refresh_secs, 9);
    }

    #[test]
    fn test_ticker_normalization() {
        assert_eq!(Config::normalize_ticker(" sber "), "SBER");
        assert_eq!(Config::normalize_ticker("gazp"), "GAZP");
        assert_eq!(Config::normalize_ticker("LKOH"), "LKOH");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.backend.base_url, deserialized.backend.base_url);
    }

    #[test]
    fn test_config_file_operations() {
        let config = Config::default();
        let temp_file = NamedTempFile::new().unwrap();

        // Test save
        config.save_to_file(temp_file.path()).unwrap();

        // Test load
        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.backend.base_url, loaded_config.backend.base_url);
    }

    #[test]
    fn test_zero_cadence_rejected() {
        let mut config = Config::default();
        config.poll.table_refresh_secs = 0;
        assert!(config.validate().is_err());
    }
}
