//! Color parsing, formatting and username color lookup
//!
//! `Color` is the parsed form used by the command layer; `HexColor` is the
//! canonical `#RRGGBB` string stored in the registry and written to CSS.
//! `ColorBook` answers "what color does this name render with", either from
//! loaded custom colors or from the hash-derived default every user gets.

pub mod luminosity;
mod names;

use crate::core::palette::DefaultPalette;
use crate::core::registry::{ColorAssignment, ColorRegistry};
use crate::i18n::Locale;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fmt;

pub use luminosity::LuminosityChecker;
pub use names::NAMED_COLORS;

/// Output format for [`Color::format`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorFormat {
    /// `#RRGGBB`
    #[default]
    Hex,
    /// `rgb(r, g, b)`
    Rgb,
    /// `hsl(h, s%, l%)`
    Hsl,
}

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create from components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from HSL (hue in degrees, saturation and lightness in percent)
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = (s / 100.0).clamp(0.0, 1.0);
        let l = (l / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = channel(l);
            return Self::rgb(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::rgb(
            channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            channel(hue_to_rgb(p, q, h)),
            channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }

    /// Convert to HSL (hue in degrees, saturation and lightness in percent)
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if (max - min).abs() < f64::EPSILON {
            return (0.0, 0.0, l * 100.0);
        }

        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if (max - r).abs() < f64::EPSILON {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if (max - g).abs() < f64::EPSILON {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        (h * 60.0, s * 100.0, l * 100.0)
    }

    /// Parse color text in any of the supported notations
    ///
    /// Accepts `#RGB`, `#RRGGBB`, `rgb(r, g, b)`,
    /// `hsl(h, s%, l%)` and color names in any of the given locales.
    pub fn parse(text: &str, locales: &[Locale]) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if text.starts_with('#') {
            return HexColor::parse(text).map(|hex| hex.to_color());
        }

        let lower = text.to_lowercase();
        if let Some(args) = function_args(&lower, "rgb") {
            let [r, g, b] = parse_triplet(args)?;
            let component = |v: f64| (0.0..=255.0).contains(&v).then(|| v.round() as u8);
            return Some(Self::rgb(component(r)?, component(g)?, component(b)?));
        }
        if let Some(args) = function_args(&lower, "hsl") {
            let [h, s, l] = parse_triplet(args)?;
            if !(0.0..=100.0).contains(&s) || !(0.0..=100.0).contains(&l) {
                return None;
            }
            return Some(Self::from_hsl(h, s, l));
        }

        names::lookup(&lower, locales)
    }

    /// Render in the given format
    pub fn format(&self, format: ColorFormat) -> String {
        match format {
            ColorFormat::Hex => self.to_hex().to_string(),
            ColorFormat::Rgb => format!("rgb({}, {}, {})", self.r, self.g, self.b),
            ColorFormat::Hsl => {
                let (h, s, l) = self.to_hsl();
                format!("hsl({:.0}, {:.0}%, {:.0}%)", h, s, l)
            }
        }
    }

    /// Canonical hex form
    pub fn to_hex(&self) -> HexColor {
        HexColor(format!("#{}", hex::encode_upper([self.r, self.g, self.b])))
    }

    /// Name of the nearest named color, localized
    pub fn name(&self, locale: Locale) -> String {
        names::nearest(self, locale)
    }

    /// WCAG relative luminance
    pub fn relative_luminance(&self) -> f64 {
        fn linear(c: u8) -> f64 {
            let c = f64::from(c) / 255.0;
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    fn distance_sq(&self, other: &Self) -> u32 {
        let d = |a: u8, b: u8| (i32::from(a) - i32::from(b)).unsigned_abs();
        d(self.r, other.r).pow(2) + d(self.g, other.g).pow(2) + d(self.b, other.b).pow(2)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_hex().as_str())
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn function_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_triplet(args: &str) -> Option<[f64; 3]> {
    let mut values = args
        .split(',')
        .map(|part| part.trim().trim_end_matches('%').trim().parse::<f64>());
    let triplet = [
        values.next()?.ok()?,
        values.next()?.ok()?,
        values.next()?.ok()?,
    ];
    values.next().is_none().then_some(triplet)
}

/// Canonical `#RRGGBB` color string
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse `#RGB` or `#RRGGBB` (with or without `#`), case-insensitive
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.trim().strip_prefix('#').unwrap_or(text.trim());
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return None,
        };
        let bytes = hex::decode(&expanded).ok()?;
        Some(Color::rgb(bytes[0], bytes[1], bytes[2]).to_hex())
    }

    /// The `#RRGGBB` text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parsed color
    pub fn to_color(&self) -> Color {
        // Always six validated hex digits after the '#'
        let bytes = hex::decode(&self.0[1..]).unwrap_or_else(|_| vec![0, 0, 0]);
        Color::rgb(bytes[0], bytes[1], bytes[2])
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid hex color: {value:?}"))
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

/// Resolves a username (or palette reference) to the color it renders with
pub trait ColorLookup {
    /// Color for the given name
    fn get(&self, name: &str) -> HexColor;
}

/// Username color library
///
/// Loaded custom colors take precedence; every other name gets a stable
/// color derived from a hash of its normalized form.
#[derive(Debug, Clone, Default)]
pub struct ColorBook {
    custom: HashMap<String, HexColor>,
}

impl ColorBook {
    /// Empty book (hash colors only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Book seeded with every color in effect in the registry
    pub fn from_registry(registry: &ColorRegistry) -> Self {
        let mut book = Self::new();
        book.load(
            registry
                .effective_entries()
                .into_iter()
                .map(|(id, assignment)| (id.as_str(), assignment)),
        );
        book
    }

    /// Book seeded with the default palette alone
    pub fn from_palette(palette: &DefaultPalette) -> Self {
        let mut book = Self::new();
        book.load(palette.iter().map(|(id, assignment)| (id.as_str(), assignment)));
        book
    }

    /// Load custom colors
    ///
    /// Named references are followed through the whole batch, so a chain
    /// `a -> b -> c` gives every link `c`'s color regardless of order.
    /// A reference leaving the batch falls back to the book, and a cycle
    /// falls back to the hash color of the name that closed it.
    pub fn load<'a, I>(&mut self, mapping: I)
    where
        I: IntoIterator<Item = (&'a str, &'a ColorAssignment)>,
    {
        let batch: HashMap<String, &ColorAssignment> = mapping
            .into_iter()
            .map(|(name, assignment)| (normalize(name), assignment))
            .collect();

        let resolved: Vec<(String, HexColor)> = batch
            .iter()
            .map(|(name, assignment)| (name.clone(), self.follow(&batch, name, assignment)))
            .collect();
        self.custom.extend(resolved);
    }

    fn follow(
        &self,
        batch: &HashMap<String, &ColorAssignment>,
        start: &str,
        assignment: &ColorAssignment,
    ) -> HexColor {
        let mut visited = HashSet::from([start.to_string()]);
        let mut current = assignment;
        loop {
            let target = match current {
                ColorAssignment::Direct { color } => return color.clone(),
                ColorAssignment::Named(name) => normalize(name),
            };
            if !visited.insert(target.clone()) {
                tracing::debug!(name = start, "Color reference cycle at {}", target);
                return Self::hash_color(&target);
            }
            match batch.get(&target) {
                Some(next) => current = *next,
                None => return self.get(&target),
            }
        }
    }

    /// Color derived from the name alone
    pub fn hash_color(name: &str) -> HexColor {
        let digest = hex::encode(Sha256::digest(normalize(name).as_bytes()));
        let slice = |start: usize| u32::from_str_radix(&digest[start..start + 4], 16).unwrap_or(0);

        let h = f64::from(slice(4) % 360);
        let s = f64::from(slice(0) % 50 + 40);
        let l = f64::from(slice(8) % 20 + 30);
        Color::from_hsl(h, s, l).to_hex()
    }
}

impl ColorLookup for ColorBook {
    fn get(&self, name: &str) -> HexColor {
        self.custom
            .get(&normalize(name))
            .cloned()
            .unwrap_or_else(|| Self::hash_color(name))
    }
}

fn normalize(name: &str) -> String {
    crate::core::registry::to_id(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(HexColor::parse("#ff0000").unwrap().as_str(), "#FF0000");
        assert_eq!(HexColor::parse("0f0").unwrap().as_str(), "#00FF00");
        assert!(HexColor::parse("#12345").is_none());
        assert!(HexColor::parse("#GGGGGG").is_none());
    }

    #[test]
    fn test_color_notations() {
        let locales = [Locale::English];
        assert_eq!(Color::parse("rgb(255, 0, 0)", &locales), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("hsl(120, 100%, 50%)", &locales), Some(Color::rgb(0, 255, 0)));
        assert!(Color::parse("rgb(300, 0, 0)", &locales).is_none());
        assert!(Color::parse("", &locales).is_none());
    }

    #[test]
    fn test_formats() {
        let color = Color::rgb(255, 0, 0);
        assert_eq!(color.format(ColorFormat::Hex), "#FF0000");
        assert_eq!(color.format(ColorFormat::Rgb), "rgb(255, 0, 0)");
        assert_eq!(color.format(ColorFormat::Hsl), "hsl(0, 100%, 50%)");
    }

    #[test]
    fn test_hsl_roundtrip_is_close() {
        let color = Color::rgb(30, 144, 255);
        let (h, s, l) = color.to_hsl();
        assert!(color.distance_sq(&Color::from_hsl(h, s, l)) <= 3);
    }

    #[test]
    fn test_hash_color_is_stable() {
        let first = ColorBook::hash_color("Some User");
        assert_eq!(first, ColorBook::hash_color("someuser"));
        assert_eq!(first, ColorBook::new().get("some-user"));
    }

    #[test]
    fn test_book_prefers_custom() {
        let mut book = ColorBook::new();
        let direct = ColorAssignment::direct("#123456").unwrap();
        let named = ColorAssignment::Named("bob".to_string());
        book.load([("bob", &direct), ("alice", &named)]);

        assert_eq!(book.get("bob").as_str(), "#123456");
        assert_eq!(book.get("alice").as_str(), "#123456");
        assert_eq!(book.get("carol"), ColorBook::hash_color("carol"));
    }

    #[test]
    fn test_reference_chains_ignore_name_order() {
        let announcer = ColorAssignment::direct("#1E5AA8").unwrap();
        let tournaments = ColorAssignment::named("announcer");
        let via_tournaments = ColorAssignment::named("tournaments");

        let mut book = ColorBook::new();
        book.load([
            ("alpha", &via_tournaments),
            ("announcer", &announcer),
            ("tournaments", &tournaments),
            ("zeta", &via_tournaments),
        ]);

        assert_eq!(book.get("tournaments").as_str(), "#1E5AA8");
        assert_eq!(book.get("alpha").as_str(), "#1E5AA8");
        assert_eq!(book.get("zeta").as_str(), "#1E5AA8");
    }

    #[test]
    fn test_reference_cycle_falls_back_to_hash() {
        let to_b = ColorAssignment::named("b");
        let to_a = ColorAssignment::named("a");
        let to_self = ColorAssignment::named("c");

        let mut book = ColorBook::new();
        book.load([("a", &to_b), ("b", &to_a), ("c", &to_self)]);

        assert_eq!(book.get("a"), ColorBook::hash_color("a"));
        assert_eq!(book.get("b"), ColorBook::hash_color("b"));
        assert_eq!(book.get("c"), ColorBook::hash_color("c"));
    }

    #[test]
    fn test_reference_outside_batch_uses_loaded_colors() {
        let direct = ColorAssignment::direct("#654321").unwrap();
        let named = ColorAssignment::named("bob");

        let mut book = ColorBook::new();
        book.load([("bob", &direct)]);
        book.load([("carol", &named)]);
        assert_eq!(book.get("carol").as_str(), "#654321");
    }
}
