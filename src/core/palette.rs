//! Built-in default colors

use crate::core::error::{ColorError, Result};
use crate::core::registry::{ColorAssignment, UserId};
use std::collections::BTreeMap;
use std::path::Path;

/// Palette compiled into the binary
const BUILTIN_PALETTE: &str = include_str!("../../assets/default_palette.json");

/// Immutable mapping of user identifiers to their default colors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultPalette {
    entries: BTreeMap<UserId, ColorAssignment>,
}

impl DefaultPalette {
    /// Empty palette
    pub fn empty() -> Self {
        Self::default()
    }

    /// Palette shipped with the binary
    pub fn builtin() -> Self {
        // Checked by test_builtin_palette_parses
        Self::from_json(BUILTIN_PALETTE).unwrap_or_default()
    }

    /// Build from entries
    pub fn from_entries(entries: impl IntoIterator<Item = (UserId, ColorAssignment)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Parse a JSON object of `id -> assignment`
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            entries: serde_json::from_str(text)?,
        })
    }

    /// Load a palette file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ColorError::Config(format!("cannot read palette {}: {}", path.display(), e))
        })?;
        Self::from_json(&text).map_err(|e| {
            ColorError::Config(format!("invalid palette {}: {}", path.display(), e))
        })
    }

    /// Default for an identifier
    pub fn get(&self, id: &str) -> Option<&ColorAssignment> {
        self.entries.get(id)
    }

    /// Entries in id order
    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &ColorAssignment)> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the palette is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_palette_parses() {
        let palette = DefaultPalette::from_json(BUILTIN_PALETTE).unwrap();
        assert!(!palette.is_empty());
        assert_eq!(palette, DefaultPalette::builtin());
    }

    #[test]
    fn test_mixed_entries() {
        let palette = DefaultPalette::from_json(
            r##"{"alice": {"color": "#ff0000"}, "bob": "alice"}"##,
        )
        .unwrap();

        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get("alice"), Some(&ColorAssignment::direct("#FF0000").unwrap()));
        assert_eq!(palette.get("bob"), Some(&ColorAssignment::Named("alice".into())));
        assert_eq!(palette.get("carol"), None);
    }

    #[test]
    fn test_invalid_keys_rejected() {
        assert!(DefaultPalette::from_json(r##"{"": {"color": "#ff0000"}}"##).is_err());
        assert!(DefaultPalette::from_json(r##"{"x": {"color": "red"}}"##).is_err());
    }
}
