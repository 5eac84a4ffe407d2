//! Custom color registry
//!
//! The registry is the built-in [`DefaultPalette`] plus an overlay of
//! explicit assignments. Only overlay entries that differ from the palette
//! are persisted or rendered; an entry identical to its default stays in
//! memory as a no-op.

use crate::core::color::{Color, ColorBook, ColorLookup, HexColor};
use crate::core::error::{ColorError, Result};
use crate::core::palette::DefaultPalette;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Maximum length of a normalized user identifier
pub const MAX_ID_LENGTH: usize = 18;

/// Overlay entries keyed by user, in lexicographic order
pub type Overlay = BTreeMap<UserId, ColorAssignment>;

/// Normalize a display name to its identifier form
///
/// Lowercases ASCII letters and drops everything that is not `[a-z0-9]`.
pub fn to_id(name: &str) -> String {
    name.chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Normalized user identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Normalize and validate a user name
    pub fn parse(name: &str) -> Result<Self> {
        let id = to_id(name);
        if id.is_empty() || id.len() > MAX_ID_LENGTH {
            return Err(ColorError::InvalidIdentifier(name.to_string()));
        }
        Ok(Self(id))
    }

    /// Identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Color assigned to a user
///
/// Persisted either as `{"color": "#RRGGBB"}` or as a bare string naming
/// another user whose color is borrowed through the color library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorAssignment {
    /// Explicit color value
    Direct { color: HexColor },
    /// Reference resolved by [`ColorLookup::get`]
    Named(String),
}

impl ColorAssignment {
    /// Direct assignment from hex text
    pub fn direct(hex: &str) -> Result<Self> {
        HexColor::parse(hex)
            .map(|color| Self::Direct { color })
            .ok_or_else(|| ColorError::InvalidColor(hex.to_string()))
    }

    /// Direct assignment from a parsed color
    pub fn from_color(color: &Color) -> Self {
        Self::Direct {
            color: color.to_hex(),
        }
    }

    /// Reference to another name's color
    pub fn named(name: &str) -> Self {
        Self::Named(to_id(name))
    }

    /// Concrete color this assignment renders with
    pub fn resolve_hex<L: ColorLookup + ?Sized>(&self, lookup: &L) -> HexColor {
        match self {
            Self::Direct { color } => color.clone(),
            Self::Named(name) => lookup.get(name),
        }
    }
}

/// Registry of custom colors layered over the default palette
///
/// Mutations must be serialized by the owner; see
/// [`UpdatePipeline`](crate::core::pipeline::UpdatePipeline).
#[derive(Debug, Clone)]
pub struct ColorRegistry {
    defaults: Arc<DefaultPalette>,
    overlay: Overlay,
}

impl ColorRegistry {
    /// Registry with no overrides
    pub fn new(defaults: Arc<DefaultPalette>) -> Self {
        Self {
            defaults,
            overlay: Overlay::new(),
        }
    }

    /// Built-in palette
    pub fn defaults(&self) -> &DefaultPalette {
        &self.defaults
    }

    /// Add an override
    ///
    /// An existing override must be removed first.
    pub fn assign(&mut self, user: &str, assignment: ColorAssignment) -> Result<UserId> {
        let id = UserId::parse(user)?;
        if self.overlay.contains_key(&id) {
            return Err(ColorError::AlreadyAssigned(id.to_string()));
        }
        self.overlay.insert(id.clone(), assignment);
        Ok(id)
    }

    /// Drop an override, falling back to the default (if any)
    pub fn remove(&mut self, user: &str) -> Result<(UserId, ColorAssignment)> {
        let id = UserId::parse(user)?;
        match self.overlay.remove(&id) {
            Some(previous) => Ok((id, previous)),
            None => Err(ColorError::NoAssignment(id.to_string())),
        }
    }

    /// Override, else default, else `None`
    pub fn resolve(&self, user: &str) -> Option<&ColorAssignment> {
        let id = to_id(user);
        self.overlay
            .get(id.as_str())
            .or_else(|| self.defaults.get(&id))
    }

    /// Whether an override exists for the user
    pub fn has_override(&self, user: &str) -> bool {
        self.overlay.contains_key(to_id(user).as_str())
    }

    /// Overrides that differ from the default, in id order
    ///
    /// This set is both what gets persisted and what gets a stylesheet rule.
    ///
    /// An override equals its default when both render the same color,
    /// whichever variant each is written in. The default is resolved against
    /// the palette alone, the override against the current registry.
    pub fn overlay_entries(&self) -> Vec<(&UserId, &ColorAssignment)> {
        let current = ColorBook::from_registry(self);
        let palette = ColorBook::from_palette(&self.defaults);

        self.overlay
            .iter()
            .filter(|(id, assignment)| match self.defaults.get(id.as_str()) {
                None => true,
                Some(default) if default == *assignment => false,
                Some(default) => assignment.resolve_hex(&current) != default.resolve_hex(&palette),
            })
            .collect()
    }

    /// Owned copy of [`overlay_entries`](Self::overlay_entries) for saving
    pub fn persisted_overlay(&self) -> Overlay {
        self.overlay_entries()
            .into_iter()
            .map(|(id, assignment)| (id.clone(), assignment.clone()))
            .collect()
    }

    /// Merge previously persisted overrides, replacing in-memory ones
    pub fn merge_persisted(&mut self, overlay: Overlay) {
        self.overlay.extend(overlay);
    }

    /// Every user with a color: defaults merged with overrides
    pub fn effective_entries(&self) -> BTreeMap<&UserId, &ColorAssignment> {
        let mut entries: BTreeMap<_, _> = self.defaults.iter().collect();
        entries.extend(self.overlay.iter());
        entries
    }

    /// Number of overrides held in memory, including no-op ones
    pub fn override_count(&self) -> usize {
        self.overlay.len()
    }

    /// Put an override back to a previous state
    pub(crate) fn restore(&mut self, id: UserId, previous: Option<ColorAssignment>) {
        match previous {
            Some(assignment) => self.overlay.insert(id, assignment),
            None => self.overlay.remove(&id),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ColorRegistry {
        let palette = DefaultPalette::from_entries([(
            UserId::parse("alice").unwrap(),
            ColorAssignment::direct("#FF0000").unwrap(),
        )]);
        ColorRegistry::new(Arc::new(palette))
    }

    #[test]
    fn test_to_id() {
        assert_eq!(to_id("Ali Ce!"), "alice");
        assert_eq!(to_id("ñandú 99"), "and99");
        assert_eq!(to_id("---"), "");
    }

    #[test]
    fn test_user_id_validation() {
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse("!!!").is_err());
        assert!(UserId::parse("abcdefghijklmnopqr").is_ok());
        assert!(matches!(
            UserId::parse("abcdefghijklmnopqrs"),
            Err(ColorError::InvalidIdentifier(_))
        ));
        // Length is checked after normalization
        assert!(UserId::parse("a b c d e f g h i j k l m n").is_ok());
    }

    #[test]
    fn test_assign_then_resolve() {
        let mut registry = registry();
        let bob = ColorAssignment::direct("#00FF00").unwrap();
        let id = registry.assign("Bob", bob.clone()).unwrap();

        assert_eq!(id.as_str(), "bob");
        assert_eq!(registry.resolve("bob"), Some(&bob));
        assert_eq!(registry.resolve("BOB"), Some(&bob));
    }

    #[test]
    fn test_assign_twice_requires_remove() {
        let mut registry = registry();
        let color = ColorAssignment::direct("#123456").unwrap();
        registry.assign("carol", color.clone()).unwrap();

        let err = registry.assign("carol", color.clone()).unwrap_err();
        assert!(matches!(err, ColorError::AlreadyAssigned(ref id) if id == "carol"));

        registry.remove("carol").unwrap();
        assert!(registry.assign("carol", color).is_ok());
    }

    #[test]
    fn test_remove_falls_back() {
        let mut registry = registry();
        registry
            .assign("alice", ColorAssignment::direct("#0000FF").unwrap())
            .unwrap();
        registry
            .assign("dave", ColorAssignment::direct("#0000FF").unwrap())
            .unwrap();

        registry.remove("alice").unwrap();
        registry.remove("dave").unwrap();

        assert_eq!(
            registry.resolve("alice"),
            Some(&ColorAssignment::direct("#FF0000").unwrap())
        );
        assert_eq!(registry.resolve("dave"), None);
        assert!(matches!(registry.remove("dave"), Err(ColorError::NoAssignment(_))));
    }

    #[test]
    fn test_overlay_entries_skip_defaults() {
        let mut registry = registry();
        registry
            .assign("alice", ColorAssignment::direct("#ff0000").unwrap())
            .unwrap();
        registry
            .assign("bob", ColorAssignment::direct("#00FF00").unwrap())
            .unwrap();

        assert!(registry.has_override("alice"));
        assert_eq!(registry.override_count(), 2);

        let ids: Vec<_> = registry
            .overlay_entries()
            .into_iter()
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(ids, vec!["bob"]);
        assert!(!registry.persisted_overlay().contains_key("alice"));
    }

    fn chained_registry() -> ColorRegistry {
        let palette = DefaultPalette::from_entries([
            (
                UserId::parse("announcer").unwrap(),
                ColorAssignment::direct("#1E5AA8").unwrap(),
            ),
            (
                UserId::parse("tournaments").unwrap(),
                ColorAssignment::named("announcer"),
            ),
        ]);
        ColorRegistry::new(Arc::new(palette))
    }

    #[test]
    fn test_overlay_entries_compare_rendered_colors() {
        let mut registry = chained_registry();
        registry
            .assign("tournaments", ColorAssignment::direct("#1E5AA8").unwrap())
            .unwrap();
        registry.assign("announcer", ColorAssignment::named("tournaments")).unwrap();

        assert_eq!(registry.override_count(), 2);
        assert!(registry.overlay_entries().is_empty());
        assert!(registry.persisted_overlay().is_empty());
    }

    #[test]
    fn test_overlay_entries_keep_real_changes() {
        let mut registry = chained_registry();
        registry
            .assign("tournaments", ColorAssignment::direct("#000000").unwrap())
            .unwrap();

        let ids: Vec<_> = registry
            .overlay_entries()
            .into_iter()
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(ids, vec!["tournaments"]);
    }

    #[test]
    fn test_effective_entries() {
        let mut registry = registry();
        registry
            .assign("alice", ColorAssignment::direct("#0000FF").unwrap())
            .unwrap();
        registry.assign("erin", ColorAssignment::named("alice")).unwrap();

        let effective = registry.effective_entries();
        assert_eq!(effective.len(), 2);
        assert_eq!(
            effective.get(&UserId::parse("alice").unwrap()),
            Some(&&ColorAssignment::direct("#0000FF").unwrap())
        );
    }

    #[test]
    fn test_assignment_serialization() {
        let direct: ColorAssignment = serde_json::from_str(r##"{"color": "#abcdef"}"##).unwrap();
        assert_eq!(direct, ColorAssignment::direct("#ABCDEF").unwrap());

        let named: ColorAssignment = serde_json::from_str(r#""bob""#).unwrap();
        assert_eq!(named, ColorAssignment::Named("bob".to_string()));

        assert_eq!(
            serde_json::to_string(&direct).unwrap(),
            r##"{"color":"#ABCDEF"}"##
        );
    }
}
