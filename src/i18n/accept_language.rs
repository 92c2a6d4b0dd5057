//! `Accept-Language` header parsing.
//!
//! Only the first entry of the header is considered, and only its primary
//! subtag: `zh-CN,zh;q=0.9,en;q=0.8` resolves to `zh`. Anything that does
//! not resolve to a supported locale falls back to [`Locale::DEFAULT`].

use crate::i18n::Locale;

/// Extract the lowercased primary subtag of the first header entry.
///
/// Returns `None` for an empty header or a first entry that is not a
/// plausible language tag (`*`, digits, punctuation).
pub fn primary_subtag(header: &str) -> Option<String> {
    let first = header.split(',').next()?;
    let tag = first.split(';').next()?.trim();
    let primary = tag.split(['-', '_']).next()?.trim();

    if primary.is_empty() || primary.len() > 8 {
        return None;
    }
    if !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(primary.to_ascii_lowercase())
}

/// Resolve the preferred locale from an optional header value.
pub fn preferred_locale(header: Option<&str>) -> Locale {
    header
        .and_then(primary_subtag)
        .and_then(|code| Locale::from_code(&code))
        .unwrap_or(Locale::DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_subtag_with_region_and_weights() {
        assert_eq!(primary_subtag("zh-CN,zh;q=0.9"), Some("zh".to_string()));
        assert_eq!(primary_subtag("en-US,en;q=0.5"), Some("en".to_string()));
        assert_eq!(primary_subtag("ZH_tw"), Some("zh".to_string()));
    }

    #[test]
    fn test_primary_subtag_uses_first_entry_only() {
        // Browsers order by preference, so the first entry wins even with a lower q
        assert_eq!(primary_subtag("fr;q=0.1, zh;q=1.0"), Some("fr".to_string()));
    }

    #[test]
    fn test_primary_subtag_malformed() {
        assert_eq!(primary_subtag(""), None);
        assert_eq!(primary_subtag("   "), None);
        assert_eq!(primary_subtag("*"), None);
        assert_eq!(primary_subtag(";q=0.9"), None);
        assert_eq!(primary_subtag("12-34"), None);
        assert_eq!(primary_subtag("averyverylongtag"), None);
    }

    #[test]
    fn test_preferred_locale() {
        assert_eq!(preferred_locale(Some("zh-CN,zh;q=0.9")), Locale::Chinese);
        assert_eq!(preferred_locale(Some("en-GB")), Locale::English);
        assert_eq!(preferred_locale(Some("de-DE,de")), Locale::English);
        assert_eq!(preferred_locale(Some("garbage!!")), Locale::English);
        assert_eq!(preferred_locale(None), Locale::English);
    }
}
