//! Contrast validation for username colors
//!
//! Names are rendered on both the light and the dark theme, so a color has
//! to stay readable against each background.

use super::Color;
use crate::i18n::keys;

/// Default minimum WCAG contrast ratio for a name color
pub const DEFAULT_MIN_CONTRAST: f64 = 3.0;

/// Chat background a color is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Light,
    Dark,
}

impl Background {
    /// Background color
    pub fn color(&self) -> Color {
        match self {
            Self::Light => Color::rgb(0xFF, 0xFF, 0xFF),
            Self::Dark => Color::rgb(0x1B, 0x1B, 0x1B),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Light => crate::i18n::t(keys::BACKGROUND_LIGHT),
            Self::Dark => crate::i18n::t(keys::BACKGROUND_DARK),
        }
    }
}

/// WCAG contrast ratio between two colors (1.0 to 21.0)
pub fn contrast_ratio(a: &Color, b: &Color) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// Luminosity checker
#[derive(Debug, Clone, Copy)]
pub struct LuminosityChecker {
    min_contrast: f64,
}

impl Default for LuminosityChecker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONTRAST)
    }
}

impl LuminosityChecker {
    /// Create with a minimum contrast ratio
    pub fn new(min_contrast: f64) -> Self {
        Self { min_contrast }
    }

    /// Background with the lowest contrast and its ratio
    pub fn worst_contrast(&self, color: &Color) -> (Background, f64) {
        [Background::Light, Background::Dark]
            .into_iter()
            .map(|bg| (bg, contrast_ratio(color, &bg.color())))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((Background::Light, 21.0))
    }

    /// Warning text if the color is hard to read, `None` if it passes
    pub fn check(&self, color: &Color) -> Option<String> {
        let (background, ratio) = self.worst_contrast(color);
        if ratio >= self.min_contrast {
            return None;
        }

        tracing::debug!(%color, ratio, ?background, "Color failed contrast check");
        Some(
            rust_i18n::t!(
                keys::LOW_CONTRAST,
                hex = color.to_hex().as_str(),
                ratio = format!("{ratio:.2}"),
                background = background.label(),
                minimum = format!("{:.1}", self.min_contrast)
            )
            .to_string(),
        )
    }
}
