//! Server-rendered HTML pages, one set per locale.
//!
//! ## Routes
//! - GET /                        - Home in the default locale
//! - GET /:locale                 - Home
//! - GET /:locale/blog            - Blog index (?view=grid|list)
//! - GET /:locale/blog/:slug      - Blog post with comments
//! - GET /:locale/projects        - Projects index (?view=grid|list)
//! - GET /:locale/projects/:slug  - Project detail

pub mod html;

use crate::content::ContentFilter;
use crate::i18n::Locale;
use crate::middleware::locale_prefix;
use crate::server::AppState;
use crate::widgets::view_mode::{self, ViewMode};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use html::PageMeta;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

/// Number of entries of each kind shown on the home page.
const HOME_ITEMS: usize = 3;

/// Errors surfaced by page routes, rendered as localized HTML.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("page not found")]
    NotFound(Locale),

    #[error("content unavailable: {1}")]
    Upstream(Locale, #[source] anyhow::Error),
}

impl PageError {
    pub fn status(&self) -> StatusCode {
        match self {
            PageError::NotFound(_) => StatusCode::NOT_FOUND,
            PageError::Upstream(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn locale(&self) -> Locale {
        match self {
            PageError::NotFound(locale) | PageError::Upstream(locale, _) => *locale,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let locale = self.locale();
        let strings = locale.strings();
        let message = match &self {
            PageError::NotFound(_) => strings.not_found,
            PageError::Upstream(_, e) => {
                error!("Page render failed: {:#}", e);
                strings.load_failed
            }
        };

        // The error page has no canonical section of its own
        let body = layout_page(
            PageMeta {
                title: Some(message),
                locale,
                section: "",
                canonical: None,
                site_url: "",
                reading_progress: false,
            },
            &format!(
                r#"<section class="error"><h1>{}</h1><a href="{}">{}</a></section>"#,
                html::escape(message),
                locale.path(""),
                html::escape(strings.nav_home)
            ),
        );
        (self.status(), body).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub view: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root_home))
        .route("/:locale", get(home))
        .route("/:locale/blog", get(blog_index))
        .route("/:locale/blog/:slug", get(blog_post))
        .route("/:locale/projects", get(projects_index))
        .route("/:locale/projects/:slug", get(project_detail))
}

fn parse_locale(code: &str) -> Result<Locale, PageError> {
    Locale::from_code(code).ok_or(PageError::NotFound(Locale::DEFAULT))
}

fn layout_page(meta: PageMeta<'_>, body: &str) -> Html<String> {
    Html(html::layout(&meta, body))
}

/// Attach the view-mode cookie when the request changed it.
fn with_view_cookie(page: Html<String>, mode: ViewMode, changed: bool) -> Response {
    if changed {
        ([(header::SET_COOKIE, mode.set_cookie())], page).into_response()
    } else {
        page.into_response()
    }
}

/// Fallback for unmatched routes, localized by the path prefix.
pub async fn not_found(uri: Uri) -> PageError {
    debug!("No route for {}", uri.path());
    PageError::NotFound(locale_prefix(uri.path()).unwrap_or_default())
}

/// GET /
async fn root_home(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    render_home(&state, Locale::DEFAULT).await
}

/// GET /:locale
async fn home(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Html<String>, PageError> {
    let locale = parse_locale(&code)?;
    render_home(&state, locale).await
}

async fn render_home(state: &AppState, locale: Locale) -> Result<Html<String>, PageError> {
    let filter = ContentFilter::language(locale);
    let (mut posts, mut projects) = futures::try_join!(
        state.content.get_all_blog_posts(&filter),
        state.content.get_all_projects(&filter),
    )
    .map_err(|e| PageError::Upstream(locale, e))?;
    posts.truncate(HOME_ITEMS);
    projects.truncate(HOME_ITEMS);

    let strings = locale.strings();
    let body = format!(
        r#"<section class="hero"><h1>{}</h1><p>{}</p></section><section><h2>{}</h2>{}</section><section><h2>{}</h2>{}</section>"#,
        html::escape(strings.site_title),
        html::escape(strings.tagline),
        html::escape(strings.latest_posts),
        html::post_list(&posts, locale, ViewMode::Grid),
        html::escape(strings.featured_projects),
        html::project_list(&projects, locale, ViewMode::Grid),
    );

    Ok(layout_page(
        PageMeta {
            title: None,
            locale,
            section: "",
            canonical: None,
            site_url: &state.config.site_url,
            reading_progress: false,
        },
        &body,
    ))
}

/// GET /:locale/blog
async fn blog_index(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<ViewQuery>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let locale = parse_locale(&code)?;
    let view = view_mode::resolve(query.view.as_deref(), &headers);

    let posts = state
        .content
        .get_all_blog_posts(&ContentFilter::language(locale))
        .await
        .map_err(|e| PageError::Upstream(locale, e))?;

    let strings = locale.strings();
    let body = format!(
        "<h1>{}</h1>{}{}",
        html::escape(strings.nav_blog),
        html::view_toggle(locale, "/blog", view.mode),
        html::post_list(&posts, locale, view.mode)
    );
    let page = layout_page(
        PageMeta {
            title: Some(strings.nav_blog),
            locale,
            section: "/blog",
            canonical: None,
            site_url: &state.config.site_url,
            reading_progress: false,
        },
        &body,
    );
    Ok(with_view_cookie(page, view.mode, view.changed))
}

/// GET /:locale/blog/:slug
async fn blog_post(
    State(state): State<AppState>,
    Path((code, slug)): Path<(String, String)>,
) -> Result<Html<String>, PageError> {
    let locale = parse_locale(&code)?;
    let post = state
        .content
        .get_blog_post_by_slug(locale, &slug)
        .await
        .map_err(|e| PageError::Upstream(locale, e))?
        .ok_or(PageError::NotFound(locale))?;

    let (blocks, comments) = futures::try_join!(
        state.content.get_post_content(&post.id),
        state.content.get_comments_by_post_id(&post.id),
    )
    .map_err(|e| PageError::Upstream(locale, e))?;

    let body = html::post_article(&post, &blocks, &comments, locale);
    Ok(layout_page(
        PageMeta {
            title: Some(&post.title),
            locale,
            section: "/blog",
            canonical: Some(post.url_path()),
            site_url: &state.config.site_url,
            reading_progress: true,
        },
        &body,
    ))
}

/// GET /:locale/projects
async fn projects_index(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<ViewQuery>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let locale = parse_locale(&code)?;
    let view = view_mode::resolve(query.view.as_deref(), &headers);

    let projects = state
        .content
        .get_all_projects(&ContentFilter::language(locale))
        .await
        .map_err(|e| PageError::Upstream(locale, e))?;

    let strings = locale.strings();
    let body = format!(
        "<h1>{}</h1>{}{}",
        html::escape(strings.nav_projects),
        html::view_toggle(locale, "/projects", view.mode),
        html::project_list(&projects, locale, view.mode)
    );
    let page = layout_page(
        PageMeta {
            title: Some(strings.nav_projects),
            locale,
            section: "/projects",
            canonical: None,
            site_url: &state.config.site_url,
            reading_progress: false,
        },
        &body,
    );
    Ok(with_view_cookie(page, view.mode, view.changed))
}

/// GET /:locale/projects/:slug
async fn project_detail(
    State(state): State<AppState>,
    Path((code, slug)): Path<(String, String)>,
) -> Result<Html<String>, PageError> {
    let locale = parse_locale(&code)?;
    let project = state
        .content
        .get_project_by_slug(locale, &slug)
        .await
        .map_err(|e| PageError::Upstream(locale, e))?
        .ok_or(PageError::NotFound(locale))?;

    Ok(layout_page(
        PageMeta {
            title: Some(&project.title),
            locale,
            section: "/projects",
            canonical: Some(project.url_path()),
            site_url: &state.config.site_url,
            reading_progress: false,
        },
        &html::project_article(&project, locale),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!(parse_locale("zh").unwrap(), Locale::Chinese);
        assert!(matches!(
            parse_locale("fr"),
            Err(PageError::NotFound(Locale::English))
        ));
    }

    #[tokio::test]
    async fn test_not_found_page_is_localized() {
        let response = not_found("/zh/nowhere".parse().unwrap()).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_text(response).await;
        assert!(body.contains(r#"<html lang="zh-CN">"#));
        assert!(body.contains("页面不存在"));
    }

    #[tokio::test]
    async fn test_upstream_error_page() {
        let response =
            PageError::Upstream(Locale::English, anyhow::anyhow!("notion down")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(body.contains("Content could not be loaded"));
        assert!(!body.contains("notion down"));
    }

    #[test]
    fn test_view_cookie_only_when_changed() {
        let page = Html("x".to_string());
        let response = with_view_cookie(page.clone(), ViewMode::List, true);
        let cookie = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(cookie.to_str().unwrap().starts_with("view-mode=list"));

        let response = with_view_cookie(page, ViewMode::List, false);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}
