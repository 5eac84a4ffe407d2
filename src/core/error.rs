//! Error types shared by the registry, the store and the update pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the core
pub type Result<T, E = ColorError> = std::result::Result<T, E>;

/// Color registry error types
#[derive(Error, Debug)]
pub enum ColorError {
    /// Identifier is empty or longer than the allowed length after normalization
    #[error("Invalid user identifier: {0:?}")]
    InvalidIdentifier(String),
    /// An override already exists and must be removed first
    #[error("User {0} already has a custom color; remove it first")]
    AlreadyAssigned(String),
    /// No override is present for the user
    #[error("User {0} has no custom color")]
    NoAssignment(String),
    /// Color text could not be parsed
    #[error("Not a valid color: {0}")]
    InvalidColor(String),
    #[error("Failed to write {path}: {source}")]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize color data: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Template has no substitution marker
    #[error("Stylesheet template is missing the {0:?} marker")]
    TemplateMarkerMissing(&'static str),
    #[error("Stylesheet template {path} could not be read: {source}")]
    TemplateMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ColorError {
    /// Errors caused by caller input rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier(_)
                | Self::AlreadyAssigned(_)
                | Self::NoAssignment(_)
                | Self::InvalidColor(_)
        )
    }
}
