//! Stylesheet generation
//!
//! The stylesheet is rebuilt from scratch on every change: one block per
//! overlay entry, in registry order, substituted into the static template.
//! Generation does no I/O, so identical inputs give byte-identical output.

use crate::core::color::{ColorLookup, HexColor};
use crate::core::error::{ColorError, Result};
use crate::core::registry::{ColorRegistry, UserId};
use crate::core::rooms::RoomDescriptor;
use std::fmt::Write;

/// Substitution marker in the template
pub const TEMPLATE_MARKER: &str = "<!-- Custom Colors -->";

/// Builds the custom color stylesheet
#[derive(Clone, Copy)]
pub struct StylesheetGenerator<'a> {
    colors: &'a dyn ColorLookup,
}

impl<'a> StylesheetGenerator<'a> {
    /// Generator resolving named assignments through `colors`
    pub fn new(colors: &'a dyn ColorLookup) -> Self {
        Self { colors }
    }

    /// Full stylesheet document
    pub fn generate(
        &self,
        registry: &ColorRegistry,
        rooms: &[RoomDescriptor],
        template: &str,
    ) -> Result<String> {
        if !template.contains(TEMPLATE_MARKER) {
            return Err(ColorError::TemplateMarkerMissing(TEMPLATE_MARKER));
        }

        let rules = self.rules(registry, rooms);
        Ok(template.replacen(TEMPLATE_MARKER, &rules, 1))
    }

    /// Concatenated rule blocks, each followed by a newline
    pub fn rules(&self, registry: &ColorRegistry, rooms: &[RoomDescriptor]) -> String {
        let room_ids = styled_rooms(rooms);
        let entries = registry.overlay_entries();
        tracing::debug!(
            users = entries.len(),
            rooms = room_ids.len(),
            "Generating custom color rules"
        );

        entries
            .into_iter()
            .map(|(id, assignment)| {
                let color = assignment.resolve_hex(self.colors);
                let mut block = user_rules(id, &color, &room_ids);
                block.push('\n');
                block
            })
            .collect()
    }
}

impl std::fmt::Debug for StylesheetGenerator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StylesheetGenerator").finish_non_exhaustive()
    }
}

/// Ids of rooms that get user list selectors, sorted and deduplicated
pub fn styled_rooms(rooms: &[RoomDescriptor]) -> Vec<&str> {
    let mut ids: Vec<&str> = rooms
        .iter()
        .filter(|room| room.is_styled())
        .map(|room| room.id.as_str())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Rules for one user
///
/// The user list rule covers every styled room; with no rooms it is left out
/// and only the chat message rule remains.
pub fn user_rules(id: &UserId, color: &HexColor, rooms: &[&str]) -> String {
    let mut css = String::new();

    if !rooms.is_empty() {
        let selectors: Vec<String> = rooms
            .iter()
            .flat_map(|room| {
                let base = format!("#{room}-userlist-user-{id}");
                [
                    format!("{base} strong em"),
                    format!("{base} strong"),
                    format!("{base} span"),
                ]
            })
            .collect();
        let _ = write!(css, "{}{{\ncolor: {} !important;\n}}\n", selectors.join(", "), color);
    }

    let _ = write!(
        css,
        ".chat.chatmessage-{id} strong {{\ncolor: {color} !important;\n}}"
    );
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorBook;
    use crate::core::palette::DefaultPalette;
    use crate::core::registry::ColorAssignment;
    use std::sync::Arc;

    fn registry() -> ColorRegistry {
        let palette = DefaultPalette::from_entries([(
            UserId::parse("alice").unwrap(),
            ColorAssignment::direct("#FF0000").unwrap(),
        )]);
        ColorRegistry::new(Arc::new(palette))
    }

    fn rooms() -> Vec<RoomDescriptor> {
        vec![RoomDescriptor::chat("lobby"), RoomDescriptor::chat("help")]
    }

    #[test]
    fn test_user_rules_format() {
        let id = UserId::parse("bob").unwrap();
        let color = HexColor::parse("#00FF00").unwrap();
        let css = user_rules(&id, &color, &["lobby"]);

        assert_eq!(
            css,
            "#lobby-userlist-user-bob strong em, #lobby-userlist-user-bob strong, \
             #lobby-userlist-user-bob span{\ncolor: #00FF00 !important;\n}\n\
             .chat.chatmessage-bob strong {\ncolor: #00FF00 !important;\n}"
        );
    }

    #[test]
    fn test_no_rooms_keeps_message_rule() {
        let id = UserId::parse("bob").unwrap();
        let color = HexColor::parse("#00FF00").unwrap();
        let css = user_rules(&id, &color, &[]);
        assert_eq!(css, ".chat.chatmessage-bob strong {\ncolor: #00FF00 !important;\n}");
    }

    #[test]
    fn test_generate_only_overrides() {
        let mut registry = registry();
        registry
            .assign("bob", ColorAssignment::direct("#00FF00").unwrap())
            .unwrap();
        let book = ColorBook::new();

        let css = StylesheetGenerator::new(&book)
            .generate(&registry, &rooms(), "before\n<!-- Custom Colors -->\nafter")
            .unwrap();

        assert!(css.starts_with("before\n#help-userlist-user-bob strong em"));
        assert!(css.contains("#lobby-userlist-user-bob span"));
        assert!(css.contains("color: #00FF00 !important;"));
        assert!(css.ends_with("}\n\nafter"));
        assert!(!css.contains("alice"));
        assert!(!css.contains(TEMPLATE_MARKER));
    }

    #[test]
    fn test_default_valued_override_is_skipped() {
        let mut registry = registry();
        registry
            .assign("alice", ColorAssignment::direct("#FF0000").unwrap())
            .unwrap();
        let book = ColorBook::new();

        let css = StylesheetGenerator::new(&book)
            .generate(&registry, &rooms(), TEMPLATE_MARKER)
            .unwrap();
        assert_eq!(css, "");
    }

    #[test]
    fn test_chained_references_render_the_same_color() {
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
        let mut registry = ColorRegistry::new(Arc::new(palette));
        registry.assign("alpha", ColorAssignment::named("tournaments")).unwrap();
        registry.assign("zeta", ColorAssignment::named("tournaments")).unwrap();
        let book = ColorBook::from_registry(&registry);

        let css = StylesheetGenerator::new(&book)
            .generate(&registry, &rooms(), TEMPLATE_MARKER)
            .unwrap();

        assert!(css.contains(".chat.chatmessage-alpha strong {\ncolor: #1E5AA8 !important;\n}"));
        assert!(css.contains(".chat.chatmessage-zeta strong {\ncolor: #1E5AA8 !important;\n}"));
        assert!(!css.contains("tournaments"));
    }

    #[test]
    fn test_named_assignment_resolves() {
        let mut registry = registry();
        registry.assign("erin", ColorAssignment::named("frank")).unwrap();
        let book = ColorBook::new();

        let css = StylesheetGenerator::new(&book).rules(&registry, &[]);
        assert!(css.contains(ColorBook::hash_color("frank").as_str()));
    }

    #[test]
    fn test_filtered_rooms_and_order() {
        let mut snapshot = rooms();
        snapshot.push(RoomDescriptor::chat("global"));
        snapshot.push(RoomDescriptor::chat("3rdroom"));
        snapshot.push(RoomDescriptor::chat("lobby"));
        assert_eq!(styled_rooms(&snapshot), vec!["help", "lobby"]);
    }

    #[test]
    fn test_deterministic() {
        let mut registry = registry();
        for (name, hex) in [("zed", "#111111"), ("bob", "#222222"), ("mia", "#333333")] {
            registry.assign(name, ColorAssignment::direct(hex).unwrap()).unwrap();
        }
        let book = ColorBook::new();
        let generator = StylesheetGenerator::new(&book);
        let mut reversed = rooms();
        reversed.reverse();

        let first = generator.generate(&registry, &rooms(), TEMPLATE_MARKER).unwrap();
        let second = generator.generate(&registry, &reversed, TEMPLATE_MARKER).unwrap();
        assert_eq!(first, second);

        let bob = first.find("chatmessage-bob").unwrap();
        let mia = first.find("chatmessage-mia").unwrap();
        let zed = first.find("chatmessage-zed").unwrap();
        assert!(bob < mia && mia < zed);
    }

    #[test]
    fn test_missing_marker() {
        let book = ColorBook::new();
        let err = StylesheetGenerator::new(&book)
            .generate(&registry(), &rooms(), "body {}")
            .unwrap_err();
        assert!(matches!(err, ColorError::TemplateMarkerMissing(_)));
    }
}
