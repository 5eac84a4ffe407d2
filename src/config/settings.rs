//! Application settings

use crate::core::color::luminosity::DEFAULT_MIN_CONTRAST;
use crate::core::error::{ColorError, Result};
use crate::core::notify::DEFAULT_ACTION;
use crate::core::palette::DefaultPalette;
use crate::core::rooms::{RoomSource, RoomsFile, StaticRooms};
use crate::core::store::Store;
use crate::core::LuminosityChecker;
use crate::i18n::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// File locations
    pub storage: StorageConfig,
    /// Default palette
    pub palette: PaletteConfig,
    /// Room list
    pub rooms: RoomsConfig,
    /// Cache invalidation endpoint
    pub invalidation: InvalidationConfig,
    /// Color name parsing and validation
    pub colors: ColorsConfig,
}

impl AppConfig {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        match super::config_dir().map(|dir| dir.join("config.toml")) {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load config from a file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ColorError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content).map_err(|e| ColorError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Store for the configured paths
    pub fn store(&self) -> Store {
        Store::new(
            self.storage.resolve(&self.storage.overlay_file),
            self.storage.template.clone(),
            self.storage.resolve(&self.storage.stylesheet),
        )
    }

    /// Built-in palette, or the configured replacement
    pub fn default_palette(&self) -> Result<DefaultPalette> {
        match &self.palette.file {
            Some(path) => DefaultPalette::from_file(path),
            None => Ok(DefaultPalette::builtin()),
        }
    }

    /// Room snapshot source
    pub fn room_source(&self) -> Arc<dyn RoomSource> {
        match &self.rooms.file {
            Some(path) => Arc::new(RoomsFile::new(path.clone())),
            None => Arc::new(StaticRooms::default()),
        }
    }

    /// Contrast checker
    pub fn checker(&self) -> LuminosityChecker {
        LuminosityChecker::new(self.colors.min_contrast)
    }
}

/// File locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for relative data paths (platform data dir if unset)
    pub data_dir: Option<PathBuf>,
    /// Saved overrides
    pub overlay_file: PathBuf,
    /// Generated stylesheet
    pub stylesheet: PathBuf,
    /// Static template containing the substitution marker
    pub template: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            overlay_file: PathBuf::from("customcolors.json"),
            stylesheet: PathBuf::from("custom.css"),
            template: PathBuf::from("config/custom.template.css"),
        }
    }
}

impl StorageConfig {
    /// Resolve a data path against the data directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.data_dir
            .clone()
            .or_else(super::data_dir)
            .map_or_else(|| path.to_path_buf(), |dir| dir.join(path))
    }
}

/// Default palette settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// JSON palette replacing the built-in one
    pub file: Option<PathBuf>,
}

/// Room list settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomsConfig {
    /// JSON array of `{id, type, isPersonal}` exported by the chat server
    pub file: Option<PathBuf>,
}

/// Cache invalidation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvalidationConfig {
    /// Endpoint URL; notifications are disabled when unset
    pub endpoint: Option<String>,
    /// Action name sent with the request
    pub action: String,
}

impl Default for InvalidationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            action: DEFAULT_ACTION.to_string(),
        }
    }
}

/// Color parsing and validation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Locales tried, in order, when parsing color names
    pub locales: Vec<Locale>,
    /// Locale for replies and color names
    pub reply_locale: Locale,
    /// Minimum contrast ratio against either chat background
    pub min_contrast: f64,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            locales: vec![Locale::English, Locale::Spanish],
            reply_locale: Locale::English,
            min_contrast: DEFAULT_MIN_CONTRAST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [storage]
            data_dir = "/srv/chat/data"

            [invalidation]
            endpoint = "https://login.example.com/action.php"

            [colors]
            locales = ["es"]
            "#,
        )
        .unwrap();

        assert_eq!(config.invalidation.action, "invalidatecss");
        assert_eq!(config.colors.locales, vec![Locale::Spanish]);
        assert_eq!(config.colors.min_contrast, DEFAULT_MIN_CONTRAST);

        let store = config.store();
        assert_eq!(store.storage_path(), Path::new("/srv/chat/data/customcolors.json"));
        assert_eq!(store.stylesheet_path(), Path::new("/srv/chat/data/custom.css"));
        assert_eq!(store.template_path(), Path::new("config/custom.template.css"));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(toml::from_str::<AppConfig>(&text).unwrap(), config);
    }

    #[test]
    fn test_builtin_palette_by_default() {
        let palette = AppConfig::default().default_palette().unwrap();
        assert_eq!(palette, DefaultPalette::builtin());
    }
}
