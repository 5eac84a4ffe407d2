//! Internationalization (i18n) module
//!
//! Provides multi-language support for command replies and color names.
//! Currently supports:
//! - English (en)
//! - Spanish (es)

use serde::{Deserialize, Serialize};

/// Supported locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    /// English (default)
    #[default]
    #[serde(rename = "en")]
    English,
    /// Spanish (Español)
    #[serde(rename = "es")]
    Spanish,
}

impl Locale {
    /// Get locale code
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
        }
    }

    /// Parse from string
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Some(Self::English),
            "es" | "es-es" | "es-mx" => Some(Self::Spanish),
            _ => None,
        }
    }
}

/// Set the locale used by [`t`] and `t!` calls without an explicit locale
pub fn set_locale(locale: Locale) {
    rust_i18n::set_locale(locale.code());
}

/// Translate a key using rust-i18n
///
/// This is a wrapper around the rust_i18n::t! macro for use in code.
/// For interpolated messages, use the t! macro directly.
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Translation keys for command replies
pub mod keys {
    pub const ASSIGNED: &str = "msg.assigned";
    pub const REMOVED: &str = "msg.removed";
    pub const DEPLOYED: &str = "msg.deployed";
    pub const SHOW: &str = "msg.show";
    pub const SOURCE_CUSTOM: &str = "msg.source_custom";
    pub const SOURCE_DEFAULT: &str = "msg.source_default";
    pub const SOURCE_HASH: &str = "msg.source_hash";
    pub const CHECK_COLOR: &str = "msg.check_color";
    pub const CHECK_USER: &str = "msg.check_user";
    pub const CHECK_OK: &str = "msg.check_ok";
    pub const CHECK_OK_USER: &str = "msg.check_ok_user";
    pub const LOW_CONTRAST: &str = "msg.low_contrast";
    pub const BACKGROUND_LIGHT: &str = "msg.background_light";
    pub const BACKGROUND_DARK: &str = "msg.background_dark";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_codes() {
        assert_eq!(Locale::from_code("ES-mx"), Some(Locale::Spanish));
        assert_eq!(Locale::from_code("en"), Some(Locale::English));
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::Spanish.code(), "es");
    }
}
