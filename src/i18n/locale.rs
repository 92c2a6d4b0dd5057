//! Locale type: the closed set of languages the site is published in.

use crate::i18n::{LocaleConfig, LocaleRegistry, LocaleStrings};
use anyhow::{bail, Result};
use serde::{Serialize, Serializer};

/// A supported site locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    English,
    Chinese,
}

impl Locale {
    /// The locale served at the site root.
    pub const DEFAULT: Locale = Locale::English;

    /// Parse a URL code ("en", "zh"). Matching is exact.
    pub fn from_code(code: &str) -> Option<Locale> {
        LocaleRegistry::get_by_code(code).map(|config| config.locale)
    }

    /// Parse a filter value from a query string.
    ///
    /// Accepts either the CMS label ("Chinese") or the URL code ("zh"),
    /// ignoring ASCII case.
    pub fn parse_filter(value: &str) -> Result<Locale> {
        let value = value.trim();
        if let Some(config) = LocaleRegistry::get_by_cms_label(value) {
            return Ok(config.locale);
        }
        if let Some(locale) = Locale::from_code(&value.to_ascii_lowercase()) {
            return Ok(locale);
        }
        bail!("Unknown language: '{}'", value)
    }

    pub fn config(&self) -> &'static LocaleConfig {
        match self {
            Locale::English => &LocaleRegistry::all()[0],
            Locale::Chinese => &LocaleRegistry::all()[1],
        }
    }

    /// URL code (e.g., "en").
    pub fn code(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Chinese => "zh",
        }
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Label stored in the Notion `Language` select.
    pub fn cms_label(&self) -> &'static str {
        self.config().cms_label
    }

    pub fn html_lang(&self) -> &'static str {
        self.config().html_lang
    }

    pub fn is_default(&self) -> bool {
        *self == Locale::DEFAULT
    }

    /// UI strings for this locale.
    pub fn strings(&self) -> &'static LocaleStrings {
        LocaleStrings::for_locale(*self)
    }

    /// Path of `route` (e.g., "/blog") under this locale's prefix.
    pub fn path(&self, route: &str) -> String {
        format!("/{}{}", self.code(), route)
    }

    /// The other locale, for the language switcher.
    pub fn alternate(&self) -> Locale {
        match self {
            Locale::English => Locale::Chinese,
            Locale::Chinese => Locale::English,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::DEFAULT
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// Records expose the CMS label so API consumers see the same values they filter by.
impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.cms_label())
    }
}
