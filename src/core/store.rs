//! On-disk state: overlay file, template and generated stylesheet
//!
//! Writes go to a temporary file in the destination directory which is then
//! renamed over the target, so readers see either the old or the new file.

use crate::core::error::{ColorError, Result};
use crate::core::registry::Overlay;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Result of reading the overlay file
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Overlay read successfully
    Loaded(Overlay),
    /// No overlay saved yet
    NotFound,
    /// File exists but could not be read or parsed
    Unreadable { reason: String },
}

impl LoadOutcome {
    /// Overlay, or an empty one when nothing usable was stored
    pub fn into_overlay(self) -> Overlay {
        match self {
            Self::Loaded(overlay) => overlay,
            Self::NotFound => Overlay::new(),
            Self::Unreadable { reason } => {
                tracing::warn!("Ignoring unreadable color data: {}", reason);
                Overlay::new()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// File locations used by the store
#[derive(Debug, Clone)]
pub struct Store {
    storage_path: PathBuf,
    template_path: PathBuf,
    stylesheet_path: PathBuf,
}

impl Store {
    pub fn new(
        storage_path: impl Into<PathBuf>,
        template_path: impl Into<PathBuf>,
        stylesheet_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            storage_path: storage_path.into(),
            template_path: template_path.into(),
            stylesheet_path: stylesheet_path.into(),
        }
    }

    /// Overlay file path
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Template path
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Generated stylesheet path
    pub fn stylesheet_path(&self) -> &Path {
        &self.stylesheet_path
    }

    /// Read the saved overlay
    ///
    /// Never fails: a missing or corrupt file is reported through the outcome.
    pub fn load(&self) -> LoadOutcome {
        let content = match std::fs::read_to_string(&self.storage_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.storage_path.display(), "No saved color data");
                return LoadOutcome::NotFound;
            }
            Err(e) => {
                return LoadOutcome::Unreadable {
                    reason: format!("{}: {}", self.storage_path.display(), e),
                }
            }
        };

        match serde_json::from_str::<Overlay>(&content) {
            Ok(overlay) => {
                tracing::debug!(entries = overlay.len(), "Loaded saved color data");
                LoadOutcome::Loaded(overlay)
            }
            Err(e) => LoadOutcome::Unreadable {
                reason: format!("{}: {}", self.storage_path.display(), e),
            },
        }
    }

    /// Save the overlay
    pub fn save(&self, overlay: &Overlay) -> Result<()> {
        let mut content = serde_json::to_string_pretty(overlay)?;
        content.push('\n');
        write_atomic(&self.storage_path, content.as_bytes())
    }

    /// Write the generated stylesheet
    pub fn write_stylesheet(&self, css: &str) -> Result<()> {
        write_atomic(&self.stylesheet_path, css.as_bytes())
    }

    /// Read the static template
    pub fn read_template(&self) -> Result<String> {
        std::fs::read_to_string(&self.template_path).map_err(|source| ColorError::TemplateMissing {
            path: self.template_path.clone(),
            source,
        })
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let wrap = |source: std::io::Error| ColorError::StorageWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(wrap)?;

    let mut file = NamedTempFile::new_in(dir).map_err(wrap)?;
    file.write_all(contents).map_err(wrap)?;
    file.as_file().sync_all().map_err(wrap)?;
    file.persist(path).map_err(|e| wrap(e.error))?;

    tracing::trace!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(())
}
