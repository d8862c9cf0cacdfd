//! Command Line Interface module
//!
//! Implements argument parsing for the bandwatch dashboard.

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug, Clone)]
#[command(name = "bandwatch")]
#[command(about = "Stock price band dashboard")]
#[command(long_about = "Terminal dashboard tracking stock tickers against buy/sell price bands")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    #[arg(long, default_value = "bandwatch.toml")]
    pub config_file: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Backend base URL override
    #[arg(long)]
    pub backend_url: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Adjust log level based on verbose flag
    pub fn effective_log_level(&self) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            self.log_level.clone()
        }
    }

    /// The config subcommand action, if the user asked for one
    pub fn config_action(&self) -> Option<Option<ConfigAction>> {
        match &self.command {
            Some(Commands::Config { action }) => Some(action.clone()),
            None => None,
        }
    }

    /// Fold CLI overrides into the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.backend_url {
            config.backend.base_url = url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_log_level_respects_verbose() {
        let cli = Cli::parse_from(["bandwatch", "--verbose"]);
        assert_eq!(cli.effective_log_level(), "debug");

        let cli = Cli::parse_from(["bandwatch", "--log-level", "warn"]);
        assert_eq!(cli.effective_log_level(), "warn");
    }

    #[test]
    fn test_backend_url_override() {
        let cli = Cli::parse_from(["bandwatch", "--backend-url", "http://example.com:9000"]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.backend.base_url, "http://example.com:9000");
    }
}
