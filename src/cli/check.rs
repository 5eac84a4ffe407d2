//! Color preview and validation reply

use crate::core::color::{Color, ColorFormat, ColorLookup, LuminosityChecker};
use crate::core::error::{ColorError, Result};
use crate::core::registry::UserId;
use crate::i18n::{keys, Locale};

/// Outcome of checking a color or a user's current color
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// User whose color was checked, if any
    pub user: Option<UserId>,
    /// Checked color
    pub color: Color,
    /// Contrast warning
    pub warning: Option<String>,
}

impl CheckReport {
    /// Localized reply text
    pub fn render(&self, locale: Locale) -> String {
        let code = locale.code();
        let name = self.color.name(locale);
        let hex = self.color.format(ColorFormat::Hex);
        let hsl = self.color.format(ColorFormat::Hsl);

        let description = match &self.user {
            Some(user) => rust_i18n::t!(
                keys::CHECK_USER,
                locale = code,
                name = name,
                user = user.as_str(),
                hex = hex,
                hsl = hsl
            ),
            None => rust_i18n::t!(keys::CHECK_COLOR, locale = code, name = name, hex = hex, hsl = hsl),
        };

        let verdict = match (&self.warning, &self.user) {
            (Some(warning), _) => warning.clone(),
            (None, Some(user)) => {
                rust_i18n::t!(keys::CHECK_OK_USER, locale = code, user = user.as_str()).to_string()
            }
            (None, None) => rust_i18n::t!(keys::CHECK_OK, locale = code).to_string(),
        };

        format!("{description}\n{verdict}")
    }
}

/// Check a color, or the color of `@user` (a bare name that is not a color
/// is also taken as a user)
pub fn check_color(
    target: &str,
    colors: &dyn ColorLookup,
    locales: &[Locale],
    checker: &LuminosityChecker,
) -> Result<CheckReport> {
    let target = target.trim();

    let (user, color) = match target.strip_prefix('@') {
        Some(name) => {
            let id = UserId::parse(name)?;
            let color = colors.get(id.as_str()).to_color();
            (Some(id), color)
        }
        None => match Color::parse(target, locales) {
            Some(color) => (None, color),
            None => {
                let id = UserId::parse(target).map_err(|_| ColorError::InvalidColor(target.to_string()))?;
                let color = colors.get(id.as_str()).to_color();
                (Some(id), color)
            }
        },
    };

    Ok(CheckReport {
        user,
        warning: checker.check(&color),
        color,
    })
}
