//! Locale-routing middleware.
//!
//! The routing rule lives in [`decide`], a pure function over the request
//! path, the `Accept-Language` value and the loop-prevention marker. The
//! axum wrapper [`locale_redirect`] only extracts those inputs and turns
//! the [`Action`] into a response.

use crate::i18n::{preferred_locale, Locale};
use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

/// Header set on redirect responses and honoured on requests.
pub const REDIRECT_MARKER_HEADER: &str = "x-locale-redirected";

/// Cookie set on redirect responses so the browser carries the marker back.
pub const REDIRECT_MARKER_COOKIE: &str = "locale-redirected";

/// Path prefixes the middleware never touches.
const EXCLUDED_PREFIXES: [&str; 3] = ["/api", "/_next", "/static"];

/// What to do with an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Serve the request as-is.
    PassThrough,
    /// Redirect to the given locale-prefixed location.
    Redirect(String),
    /// The path already carries a locale prefix.
    AlreadyLocalized(Locale),
}

/// Decide how to route a request.
///
/// Only the bare root is ever redirected, and only when the browser's first
/// preferred language is a supported non-default locale. Everything else,
/// including unprefixed deep links, is served in the default locale.
pub fn decide(path: &str, accept_language: Option<&str>, already_redirected: bool) -> Action {
    if already_redirected {
        return Action::PassThrough;
    }

    if let Some(locale) = locale_prefix(path) {
        return Action::AlreadyLocalized(locale);
    }

    if path != "/" {
        return Action::PassThrough;
    }

    let preferred = preferred_locale(accept_language);
    if preferred.is_default() {
        Action::PassThrough
    } else {
        Action::Redirect(preferred.path(""))
    }
}

/// The locale named by the first path segment, if any.
///
/// `/zh` and `/zh/blog` match; `/zhongwen` does not.
pub fn locale_prefix(path: &str) -> Option<Locale> {
    let rest = path.strip_prefix('/')?;
    let segment = rest.split('/').next()?;
    Locale::from_code(segment)
}

/// Whether the middleware applies to `path`.
///
/// API routes, framework/static assets and anything that looks like a file
/// (last segment contains a dot) are excluded.
pub fn should_intercept(path: &str) -> bool {
    let excluded = EXCLUDED_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    });
    if excluded {
        return false;
    }

    let last_segment = path.rsplit('/').next().unwrap_or_default();
    !last_segment.contains('.')
}

/// Whether the request carries the loop-prevention marker (header or cookie).
pub fn is_already_redirected(headers: &HeaderMap) -> bool {
    if headers.contains_key(REDIRECT_MARKER_HEADER) {
        return true;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, _)| name == REDIRECT_MARKER_COOKIE)
}

/// axum middleware applying [`decide`] to every intercepted request.
pub async fn locale_redirect(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if !should_intercept(&path) {
        return next.run(request).await;
    }

    // Non-UTF-8 header values are treated like an absent header
    let accept_language = request
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());
    let already_redirected = is_already_redirected(request.headers());

    match decide(&path, accept_language, already_redirected) {
        Action::Redirect(location) => {
            debug!("Redirecting {} to {}", path, location);
            redirect_response(&location)
        }
        Action::AlreadyLocalized(_) | Action::PassThrough => next.run(request).await,
    }
}

fn redirect_response(location: &str) -> Response {
    let mut response = Redirect::temporary(location).into_response();
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static(REDIRECT_MARKER_HEADER),
        HeaderValue::from_static("1"),
    );
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_static("locale-redirected=1; Path=/; SameSite=Lax"),
    );
    response
}
