use chatcolor_core::i18n::{keys, set_locale, t, Locale};
use chatcolor_core::Color;

#[test]
fn i18n_reply_keys_resolve() {
    set_locale(Locale::English);
    assert_eq!(t(keys::SOURCE_CUSTOM), "custom");
    assert_eq!(t(keys::BACKGROUND_DARK), "dark");

    set_locale(Locale::Spanish);
    assert_eq!(t(keys::SOURCE_CUSTOM), "personalizado");
    assert_eq!(t(keys::BACKGROUND_DARK), "oscuro");

    set_locale(Locale::English);
}

#[test]
fn i18n_color_names_resolve() {
    let navy = Color::rgb(0x00, 0x00, 0x80);
    assert_eq!(navy.name(Locale::English), "navy");
    assert_eq!(navy.name(Locale::Spanish), "azul marino");

    assert_eq!(Color::parse("azul marino", &[Locale::Spanish]), Some(navy));
    assert_eq!(Color::parse("Royal Blue", &[Locale::English]), Some(Color::rgb(0x41, 0x69, 0xE1)));
}
