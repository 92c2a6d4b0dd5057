//! Locale registry: Single source of truth for all supported locales.
//!
//! Every other module asks this table for codes, display names and the
//! label the CMS uses in its `Language` select property. Adding a locale
//! means adding a row here and a variant to [`Locale`].

use crate::i18n::Locale;

/// Metadata for a supported locale.
#[derive(Debug, Clone, Copy)]
pub struct LocaleConfig {
    /// The typed locale this row describes
    pub locale: Locale,

    /// URL prefix and ISO 639-1 code (e.g., "en", "zh")
    pub code: &'static str,

    /// English name of the locale (e.g., "English", "Chinese")
    pub name: &'static str,

    /// Native name shown in the language switcher (e.g., "中文")
    pub native_name: &'static str,

    /// Value of the Notion `Language` select option for this locale
    pub cms_label: &'static str,

    /// Value for the `<html lang>` attribute
    pub html_lang: &'static str,

    /// Whether this locale is served at the site root (only one should be true)
    pub is_default: bool,
}

static LOCALES: [LocaleConfig; 2] = [
    LocaleConfig {
        locale: Locale::English,
        code: "en",
        name: "English",
        native_name: "English",
        cms_label: "English",
        html_lang: "en",
        is_default: true,
    },
    LocaleConfig {
        locale: Locale::Chinese,
        code: "zh",
        name: "Chinese",
        native_name: "中文",
        cms_label: "Chinese",
        html_lang: "zh-CN",
        is_default: false,
    },
];

/// Read-only view over the static locale table.
pub struct LocaleRegistry;

impl LocaleRegistry {
    /// All supported locales, default first.
    pub fn all() -> &'static [LocaleConfig] {
        &LOCALES
    }

    /// Look up a locale by its URL code. Matching is exact.
    pub fn get_by_code(code: &str) -> Option<&'static LocaleConfig> {
        LOCALES.iter().find(|config| config.code == code)
    }

    /// Look up a locale by its CMS label, ignoring ASCII case.
    pub fn get_by_cms_label(label: &str) -> Option<&'static LocaleConfig> {
        LOCALES
            .iter()
            .find(|config| config.cms_label.eq_ignore_ascii_case(label))
    }
}
