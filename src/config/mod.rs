//! Configuration module
//!
//! Handles application settings and platform directories

mod settings;

pub use settings::{
    AppConfig, ColorsConfig, InvalidationConfig, PaletteConfig, RoomsConfig, StorageConfig,
};

use directories::ProjectDirs;
use std::path::PathBuf;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "chatcolor", "Chatcolor")
}

/// Get the application configuration directory
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the application data directory
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}
