//! User preferences persisted as a single JSON blob.
//!
//! The blob is read once at startup and rewritten in full after every
//! update. A missing file yields defaults; a malformed one is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::MarketSymbol;
use crate::{DeskError, Result};

/// Colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Text direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub favorites: Vec<MarketSymbol>,
    #[serde(default)]
    pub direction: TextDirection,
}

fn default_language() -> String {
    "English".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: default_language(),
            currency: default_currency(),
            favorites: Vec::new(),
            direction: TextDirection::default(),
        }
    }
}

impl Settings {
    pub fn is_favorite(&self, symbol: &MarketSymbol) -> bool {
        self.favorites.contains(symbol)
    }
}

/// Partial update of [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub language: Option<String>,
    pub currency: Option<String>,
    pub favorites: Option<Vec<MarketSymbol>>,
    pub direction: Option<TextDirection>,
}

/// Settings bound to the file they are persisted in.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Reads the settings blob at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Settings`] if the file exists but cannot be read
    /// or does not parse.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                DeskError::Settings(format!("failed to parse {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No settings file, using defaults");
                Settings::default()
            }
            Err(e) => {
                return Err(DeskError::Settings(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        Ok(Self { path, settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `patch` and writes the whole record back.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Settings`] if the file cannot be written. The
    /// in-memory settings are updated either way.
    pub fn update(&mut self, patch: SettingsPatch) -> Result<()> {
        if let Some(theme) = patch.theme {
            self.settings.theme = theme;
        }
        if let Some(language) = patch.language {
            self.settings.language = language;
        }
        if let Some(currency) = patch.currency {
            self.settings.currency = currency;
        }
        if let Some(favorites) = patch.favorites {
            self.settings.favorites = favorites;
        }
        if let Some(direction) = patch.direction {
            self.settings.direction = direction;
        }
        self.persist()
    }

    /// Adds or removes `symbol` from the favourites and persists.
    ///
    /// Returns whether the symbol is a favourite afterwards.
    ///
    /// # Errors
    ///
    /// Same as [`SettingsStore::update`].
    pub fn toggle_favorite(&mut self, symbol: &MarketSymbol) -> Result<bool> {
        let mut favorites = self.settings.favorites.clone();
        let now_favorite = match favorites.iter().position(|s| s == symbol) {
            Some(pos) => {
                favorites.remove(pos);
                false
            }
            None => {
                favorites.push(symbol.clone());
                true
            }
        };
        self.update(SettingsPatch {
            favorites: Some(favorites),
            ..SettingsPatch::default()
        })?;
        Ok(now_favorite)
    }

    /// Writes to a sibling temp file, then renames over the target.
    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .and_then(|()| std::fs::rename(&tmp, &self.path))
            .map_err(|e| {
                DeskError::Settings(format!("failed to write {}: {e}", self.path.display()))
            })?;
        debug!(path = %self.path.display(), "Settings persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_wire_names_are_uppercase() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"DARK\"");
        let theme: Theme = serde_json::from_str("\"LIGHT\"").unwrap();
        assert_eq!(theme, Theme::Light);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme":"LIGHT"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.language, "English");
        assert_eq!(settings.currency, "USD");
        assert!(settings.favorites.is_empty());
        assert_eq!(settings.direction, TextDirection::Ltr);
    }
}
