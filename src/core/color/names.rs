//! Named colors and their localized names

use super::Color;
use crate::i18n::Locale;

/// CSS named colors recognized by name (translation key, value)
pub const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::rgb(0x00, 0x00, 0x00)),
    ("white", Color::rgb(0xFF, 0xFF, 0xFF)),
    ("gray", Color::rgb(0x80, 0x80, 0x80)),
    ("silver", Color::rgb(0xC0, 0xC0, 0xC0)),
    ("red", Color::rgb(0xFF, 0x00, 0x00)),
    ("darkred", Color::rgb(0x8B, 0x00, 0x00)),
    ("maroon", Color::rgb(0x80, 0x00, 0x00)),
    ("crimson", Color::rgb(0xDC, 0x14, 0x3C)),
    ("salmon", Color::rgb(0xFA, 0x80, 0x72)),
    ("coral", Color::rgb(0xFF, 0x7F, 0x50)),
    ("tomato", Color::rgb(0xFF, 0x63, 0x47)),
    ("orange", Color::rgb(0xFF, 0xA5, 0x00)),
    ("darkorange", Color::rgb(0xFF, 0x8C, 0x00)),
    ("gold", Color::rgb(0xFF, 0xD7, 0x00)),
    ("yellow", Color::rgb(0xFF, 0xFF, 0x00)),
    ("olive", Color::rgb(0x80, 0x80, 0x00)),
    ("lime", Color::rgb(0x00, 0xFF, 0x00)),
    ("green", Color::rgb(0x00, 0x80, 0x00)),
    ("darkgreen", Color::rgb(0x00, 0x64, 0x00)),
    ("forestgreen", Color::rgb(0x22, 0x8B, 0x22)),
    ("teal", Color::rgb(0x00, 0x80, 0x80)),
    ("cyan", Color::rgb(0x00, 0xFF, 0xFF)),
    ("turquoise", Color::rgb(0x40, 0xE0, 0xD0)),
    ("skyblue", Color::rgb(0x87, 0xCE, 0xEB)),
    ("royalblue", Color::rgb(0x41, 0x69, 0xE1)),
    ("blue", Color::rgb(0x00, 0x00, 0xFF)),
    ("navy", Color::rgb(0x00, 0x00, 0x80)),
    ("indigo", Color::rgb(0x4B, 0x00, 0x82)),
    ("purple", Color::rgb(0x80, 0x00, 0x80)),
    ("violet", Color::rgb(0xEE, 0x82, 0xEE)),
    ("magenta", Color::rgb(0xFF, 0x00, 0xFF)),
    ("pink", Color::rgb(0xFF, 0xC0, 0xCB)),
    ("hotpink", Color::rgb(0xFF, 0x69, 0xB4)),
    ("brown", Color::rgb(0xA5, 0x2A, 0x2A)),
    ("chocolate", Color::rgb(0xD2, 0x69, 0x1E)),
];

fn localized(key: &str, locale: Locale) -> String {
    let key = format!("color.{key}");
    rust_i18n::t!(key.as_str(), locale = locale.code()).to_string()
}

fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Find a color by name in any of the locales (CSS keywords always match)
pub(super) fn lookup(text: &str, locales: &[Locale]) -> Option<Color> {
    let wanted = compact(text);

    if let Some((_, color)) = NAMED_COLORS.iter().find(|(key, _)| *key == wanted) {
        return Some(*color);
    }

    locales.iter().find_map(|locale| {
        NAMED_COLORS
            .iter()
            .find(|(key, _)| compact(&localized(key, *locale)) == wanted)
            .map(|(_, color)| *color)
    })
}

/// Localized name of the closest named color
pub(super) fn nearest(color: &Color, locale: Locale) -> String {
    NAMED_COLORS
        .iter()
        .min_by_key(|(_, named)| color.distance_sq(named))
        .map(|(key, _)| localized(key, locale))
        .unwrap_or_default()
}
