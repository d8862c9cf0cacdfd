//! Light/dark theme with a persisted state file.
//!
//! The active theme is a single flag stored under the user config directory
//! and written back on every toggle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Palette derived from the active theme
    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                text: Color::Black,
                dim: Color::DarkGray,
                accent: Color::Blue,
                buy: Color::Red,
                sell: Color::Green,
                selection_fg: Color::White,
                selection_bg: Color::Blue,
                chart: Color::Cyan,
                info: Color::Blue,
                error: Color::Red,
            },
            Theme::Dark => Palette {
                text: Color::White,
                dim: Color::Gray,
                accent: Color::Cyan,
                buy: Color::LightRed,
                sell: Color::LightGreen,
                selection_fg: Color::Black,
                selection_bg: Color::Cyan,
                chart: Color::LightCyan,
                info: Color::LightBlue,
                error: Color::LightRed,
            },
        }
    }
}

/// Colors used by the render functions
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    /// Price below the buy bound
    pub buy: Color,
    /// Price above the sell bound
    pub sell: Color,
    pub selection_fg: Color,
    pub selection_bg: Color,
    pub chart: Color,
    pub info: Color,
    pub error: Color,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ThemeState {
    theme: Theme,
}

/// Default location of the theme state file
pub fn state_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bandwatch").join("theme.toml"))
}

/// Load the persisted theme; a missing or unreadable file falls back to the
/// default
pub fn load(path: &Path) -> Theme {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<ThemeState>(&content) {
            Ok(state) => state.theme,
            Err(e) => {
                warn!("Ignoring corrupt theme state {}: {}", path.display(), e);
                Theme::default()
            }
        },
        Err(_) => Theme::default(),
    }
}

/// Persist the theme, creating the parent directory when necessary
pub fn save(path: &Path, theme: Theme) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create state directory: {}", parent.display()))?;
    }

    let content = toml::to_string(&ThemeState { theme }).context("Failed to serialize theme")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write theme state: {}", path.display()))?;
    Ok(())
}
