//! `/sitemap.xml` and `/robots.txt`.
//!
//! Static routes are listed once per locale; every published post and every
//! project is listed under its own locale prefix.

use crate::content::{BlogPost, ContentClient, ContentFilter, Project};
use crate::error::ApiError;
use crate::i18n::LocaleRegistry;
use crate::pages::html::escape;
use crate::server::AppState;
use anyhow::Result;
use axum::{extract::State, http::header, response::IntoResponse};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// (route, change frequency, priority) for each static page
const STATIC_ROUTES: [(&str, ChangeFrequency, f32); 3] = [
    ("", ChangeFrequency::Weekly, 1.0),
    ("/blog", ChangeFrequency::Weekly, 0.8),
    ("/projects", ChangeFrequency::Monthly, 0.8),
];

/// Build the sitemap entries. `now` stamps the static routes.
pub fn build_entries(
    site_url: &str,
    posts: &[BlogPost],
    projects: &[Project],
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let site_url = site_url.trim_end_matches('/');
    let mut entries = Vec::new();

    for config in LocaleRegistry::all() {
        for (route, change_frequency, priority) in STATIC_ROUTES {
            entries.push(SitemapEntry {
                url: format!("{}{}", site_url, config.locale.path(route)),
                last_modified: now,
                change_frequency,
                priority,
            });
        }
    }

    entries.extend(posts.iter().map(|post| SitemapEntry {
        url: format!("{}{}", site_url, post.url_path()),
        last_modified: post.last_edited,
        change_frequency: ChangeFrequency::Weekly,
        priority: 0.7,
    }));

    entries.extend(projects.iter().map(|project| SitemapEntry {
        url: format!("{}{}", site_url, project.url_path()),
        last_modified: project.last_edited,
        change_frequency: ChangeFrequency::Monthly,
        priority: 0.6,
    }));

    entries
}

pub fn render_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str(&format!(
            "<url><loc>{}</loc><lastmod>{}</lastmod><changefreq>{}</changefreq><priority>{:.1}</priority></url>\n",
            escape(&entry.url),
            entry.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true),
            entry.change_frequency.as_str(),
            entry.priority
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Fetch every post and project and build the full entry list.
pub async fn generate(content: &ContentClient, site_url: &str) -> Result<Vec<SitemapEntry>> {
    let all = ContentFilter::default();
    let (posts, projects) = futures::try_join!(
        content.get_all_blog_posts(&all),
        content.get_all_projects(&all),
    )?;
    let entries = build_entries(site_url, &posts, &projects, Utc::now());
    info!(
        "Sitemap generated: {} entries ({} posts, {} projects)",
        entries.len(),
        posts.len(),
        projects.len()
    );
    Ok(entries)
}

/// GET /sitemap.xml
pub async fn sitemap_xml(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let entries = generate(&state.content, &state.config.site_url).await?;
    Ok((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_xml(&entries),
    ))
}

/// GET /robots.txt
pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!(
            "User-agent: *\nAllow: /\nDisallow: /api/\n\nSitemap: {}/sitemap.xml\n",
            state.config.site_url
        ),
    )
}
