//! Grid/list view mode for index pages, persisted in a cookie.

use axum::http::{header, HeaderMap};

pub const COOKIE_NAME: &str = "view-mode";

/// One year, in seconds
const COOKIE_MAX_AGE: u32 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn parse(value: &str) -> Option<ViewMode> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grid" => Some(ViewMode::Grid),
            "list" => Some(ViewMode::List),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }

    /// `Set-Cookie` value persisting this mode.
    pub fn set_cookie(&self) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            COOKIE_NAME,
            self.as_str(),
            COOKIE_MAX_AGE
        )
    }
}

/// The outcome of resolving the view mode for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedViewMode {
    pub mode: ViewMode,
    /// The request asked for a mode different from the stored one
    pub changed: bool,
}

fn stored_mode(headers: &HeaderMap) -> Option<ViewMode> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .and_then(|(_, value)| ViewMode::parse(value))
}

/// An explicit `?view=` wins over the cookie, which wins over the default.
/// Unknown values are ignored.
pub fn resolve(requested: Option<&str>, headers: &HeaderMap) -> ResolvedViewMode {
    let stored = stored_mode(headers);
    match requested.and_then(ViewMode::parse) {
        Some(mode) => ResolvedViewMode {
            mode,
            changed: stored != Some(mode),
        },
        None => ResolvedViewMode {
            mode: stored.unwrap_or_default(),
            changed: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_cookie(cookie: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(cookie));
        headers
    }

    #[test]
    fn test_parse() {
        assert_eq!(ViewMode::parse("grid"), Some(ViewMode::Grid));
        assert_eq!(ViewMode::parse(" LIST "), Some(ViewMode::List));
        assert_eq!(ViewMode::parse("table"), None);
    }

    #[test]
    fn test_default_is_grid() {
        let resolved = resolve(None, &HeaderMap::new());
        assert_eq!(resolved.mode, ViewMode::Grid);
        assert!(!resolved.changed);
    }

    #[test]
    fn test_cookie_is_used() {
        let resolved = resolve(None, &with_cookie("a=b; view-mode=list"));
        assert_eq!(resolved.mode, ViewMode::List);
        assert!(!resolved.changed);
    }

    #[test]
    fn test_query_overrides_cookie() {
        let resolved = resolve(Some("grid"), &with_cookie("view-mode=list"));
        assert_eq!(resolved.mode, ViewMode::Grid);
        assert!(resolved.changed);

        let same = resolve(Some("list"), &with_cookie("view-mode=list"));
        assert!(!same.changed);
    }

    #[test]
    fn test_unknown_query_value_ignored() {
        let resolved = resolve(Some("mosaic"), &with_cookie("view-mode=list"));
        assert_eq!(resolved.mode, ViewMode::List);
        assert!(!resolved.changed);
    }

    #[test]
    fn test_set_cookie() {
        let cookie = ViewMode::List.set_cookie();
        assert!(cookie.starts_with("view-mode=list;"));
        assert!(cookie.contains("Max-Age=31536000"));
    }
}
