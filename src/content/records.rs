//! Strongly-typed records built from Notion pages.

use crate::i18n::Locale;
use crate::notion::Page;
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a Notion page could not become a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("page {page_id} is missing required property '{property}'")]
    MissingProperty {
        page_id: String,
        property: &'static str,
    },

    #[error("page {page_id} has unknown language '{value}'")]
    UnknownLanguage { page_id: String, value: String },
}

/// Property names shared by the projects and blog databases.
pub mod props {
    pub const SLUG: &str = "Slug";
    pub const LANGUAGE: &str = "Language";
    pub const TAGS: &str = "Tags";
    pub const DATE: &str = "Date";
    pub const PUBLISHED: &str = "Published";

    pub const PROJECT_TITLE: &str = "Name";
    pub const PROJECT_DESCRIPTION: &str = "Description";
    pub const PROJECT_LINK: &str = "Link";
    pub const PROJECT_REPOSITORY: &str = "GitHub";
    pub const PROJECT_IMAGE: &str = "Image";

    pub const POST_TITLE: &str = "Title";
    pub const POST_SUMMARY: &str = "Summary";
    pub const POST_COVER: &str = "Cover";
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub locale: Locale,
    pub tags: Vec<String>,
    pub description: String,
    pub cover_image: Option<String>,
    pub url: Option<String>,
    pub repository_url: Option<String>,
    pub date: Option<NaiveDate>,
    pub last_edited: DateTime<Utc>,
}

impl Project {
    pub fn from_page(page: &Page) -> Result<Project, RecordError> {
        let title = require_text(page, props::PROJECT_TITLE)?;
        Ok(Project {
            id: page.id.clone(),
            slug: slug_for(page, &title),
            locale: locale_for(page)?,
            tags: page.multi_select(props::TAGS),
            description: page.text(props::PROJECT_DESCRIPTION).unwrap_or_default(),
            cover_image: page.cover_url(props::PROJECT_IMAGE),
            url: page.url(props::PROJECT_LINK),
            repository_url: page.url(props::PROJECT_REPOSITORY),
            date: page.date(props::DATE),
            last_edited: page.last_edited_time,
            title,
        })
    }

    /// Site path of the project page, e.g. `/zh/projects/工具` percent-encoded.
    pub fn url_path(&self) -> String {
        record_path(self.locale, "projects", &self.slug)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub locale: Locale,
    pub tags: Vec<String>,
    pub summary: String,
    pub cover_image: Option<String>,
    pub published: Option<NaiveDate>,
    pub last_edited: DateTime<Utc>,
}

impl BlogPost {
    pub fn from_page(page: &Page) -> Result<BlogPost, RecordError> {
        let title = require_text(page, props::POST_TITLE)?;
        Ok(BlogPost {
            id: page.id.clone(),
            slug: slug_for(page, &title),
            locale: locale_for(page)?,
            tags: page.multi_select(props::TAGS),
            summary: page.text(props::POST_SUMMARY).unwrap_or_default(),
            cover_image: page.cover_url(props::POST_COVER),
            published: page.date(props::DATE),
            last_edited: page.last_edited_time,
            title,
        })
    }

    /// Site path of the post page, with the slug percent-encoded.
    pub fn url_path(&self) -> String {
        record_path(self.locale, "blog", &self.slug)
    }
}

/// Slugs keep non-ASCII letters, so they are escaped before landing in a URL.
fn record_path(locale: Locale, section: &str, slug: &str) -> String {
    locale.path(&format!("/{}/{}", section, urlencoding::encode(slug)))
}

pub(crate) fn require_text(page: &Page, property: &'static str) -> Result<String, RecordError> {
    page.text(property).ok_or_else(|| RecordError::MissingProperty {
        page_id: page.id.clone(),
        property,
    })
}

/// Pages without a language are published in the default locale.
fn locale_for(page: &Page) -> Result<Locale, RecordError> {
    match page.select(props::LANGUAGE) {
        None => Ok(Locale::DEFAULT),
        Some(label) => Locale::parse_filter(label).map_err(|_| RecordError::UnknownLanguage {
            page_id: page.id.clone(),
            value: label.to_string(),
        }),
    }
}

fn slug_for(page: &Page, title: &str) -> String {
    page.text(props::SLUG)
        .map(|slug| slugify(&slug))
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| {
            let slug = slugify(title);
            if slug.is_empty() {
                page.id.replace('-', "")
            } else {
                slug
            }
        })
}

/// Lowercase `text` and collapse every run of non-alphanumerics into `-`.
///
/// Letters outside ASCII (e.g. CJK) are kept.
pub fn slugify(text: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let separators =
        SEPARATORS.get_or_init(|| Regex::new(r"[^\p{Alphabetic}\p{N}]+").expect("valid slug regex"));

    separators
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project_page(properties: serde_json::Value) -> Page {
        serde_json::from_value(json!({
            "id": "1234-abcd",
            "created_time": "2024-01-01T00:00:00.000Z",
            "last_edited_time": "2024-01-05T12:00:00.000Z",
            "properties": properties
        }))
        .unwrap()
    }

    #[test]
    fn test_url_path_percent_encodes_slug() {
        let page = project_page(json!({
            "Title": {"type": "title", "title": [{"plain_text": "你好"}]},
            "Language": {"type": "select", "select": {"name": "Chinese"}}
        }));
        let post = BlogPost::from_page(&page).unwrap();
        assert_eq!(post.url_path(), "/zh/blog/%E4%BD%A0%E5%A5%BD");
        assert!(post.url_path().is_ascii());

        let page = project_page(json!({
            "Name": {"type": "title", "title": [{"plain_text": "Rust Tool"}]}
        }));
        assert_eq!(Project::from_page(&page).unwrap().url_path(), "/en/projects/rust-tool");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust & Axum -- 2024  "), "rust-axum-2024");
        assert_eq!(slugify("我的 第一篇 文章"), "我的-第一篇-文章");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_project_from_full_page() {
        let page = project_page(json!({
            "Name": {"type": "title", "title": [{"plain_text": "Site Generator"}]},
            "Slug": {"type": "rich_text", "rich_text": [{"plain_text": "site-gen"}]},
            "Language": {"type": "select", "select": {"name": "Chinese"}},
            "Tags": {"type": "multi_select", "multi_select": [{"name": "rust"}]},
            "Description": {"type": "rich_text", "rich_text": [{"plain_text": "Static sites"}]},
            "Link": {"type": "url", "url": "https://gen.example.com"},
            "GitHub": {"type": "url", "url": null},
            "Date": {"type": "date", "date": {"start": "2023-11-02"}}
        }));

        let project = Project::from_page(&page).unwrap();
        assert_eq!(project.title, "Site Generator");
        assert_eq!(project.slug, "site-gen");
        assert_eq!(project.locale, Locale::Chinese);
        assert_eq!(project.tags, vec!["rust"]);
        assert_eq!(project.url.as_deref(), Some("https://gen.example.com"));
        assert_eq!(project.repository_url, None);
        assert_eq!(project.date, NaiveDate::from_ymd_opt(2023, 11, 2));
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let page = project_page(json!({
            "Name": {"type": "title", "title": []}
        }));
        assert_eq!(
            Project::from_page(&page),
            Err(RecordError::MissingProperty {
                page_id: "1234-abcd".to_string(),
                property: "Name"
            })
        );
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let page = project_page(json!({
            "Name": {"type": "title", "title": [{"plain_text": "X"}]},
            "Language": {"type": "select", "select": {"name": "French"}}
        }));
        let err = Project::from_page(&page).unwrap_err();
        assert!(err.to_string().contains("French"));
    }

    #[test]
    fn test_blog_post_defaults() {
        let page = project_page(json!({
            "Title": {"type": "title", "title": [{"plain_text": "First Post"}]}
        }));
        let post = BlogPost::from_page(&page).unwrap();
        assert_eq!(post.slug, "first-post");
        assert_eq!(post.locale, Locale::English);
        assert!(post.tags.is_empty());
        assert_eq!(post.summary, "");
        assert_eq!(post.published, None);
    }

    #[test]
    fn test_slug_falls_back_to_page_id() {
        let page = project_page(json!({
            "Title": {"type": "title", "title": [{"plain_text": "???"}]}
        }));
        assert_eq!(BlogPost::from_page(&page).unwrap().slug, "1234abcd");
    }

    #[test]
    fn test_project_serializes_camel_case() {
        let page = project_page(json!({
            "Name": {"type": "title", "title": [{"plain_text": "X"}]},
            "GitHub": {"type": "url", "url": "https://github.com/x/x"}
        }));
        let json = serde_json::to_value(Project::from_page(&page).unwrap()).unwrap();
        assert_eq!(json["repositoryUrl"], "https://github.com/x/x");
        assert_eq!(json["locale"], "English");
        assert!(json.get("lastEdited").is_some());
    }
}
