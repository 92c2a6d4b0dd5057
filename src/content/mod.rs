//! Content fetch layer: projects, blog posts and comments from Notion.
//!
//! Every call goes to Notion; nothing is cached between requests. Pages
//! that fail to map to a record are logged and skipped so a single bad row
//! never takes a listing down.

pub mod comments;
pub mod records;

pub use comments::{
    thread_comments, Comment, CommentAuthor, CommentThread, CommentValidationError, NewComment,
    ValidComment,
};
pub use records::{slugify, BlogPost, Project, RecordError};

use crate::config::Config;
use crate::i18n::Locale;
use crate::notion::{and_filters, Block, DatabaseQuery, NotionClient, Page, SortDirection};
use anyhow::{Context, Result};
use serde_json::json;
use std::cmp::Reverse;
use tracing::{info, warn};

/// Optional narrowing applied to listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentFilter {
    pub language: Option<Locale>,
}

impl ContentFilter {
    pub fn language(locale: Locale) -> Self {
        Self {
            language: Some(locale),
        }
    }
}

/// Map pages to records, logging and dropping the ones that do not fit.
fn collect_records<'a, T, E: std::fmt::Display>(
    pages: impl IntoIterator<Item = &'a Page>,
    kind: &str,
    map: impl Fn(&Page) -> Result<T, E>,
) -> Vec<T> {
    pages
        .into_iter()
        .filter_map(|page| match map(page) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping {}: {}", kind, e);
                None
            }
        })
        .collect()
}

fn language_filter(filter: &ContentFilter) -> Option<serde_json::Value> {
    filter.language.map(|locale| {
        json!({
            "property": records::props::LANGUAGE,
            "select": { "equals": locale.cms_label() }
        })
    })
}

#[derive(Debug, Clone)]
pub struct ContentClient {
    notion: NotionClient,
    projects_database_id: String,
    blog_database_id: String,
    comments_database_id: String,
}

impl ContentClient {
    pub fn new(config: &Config) -> Self {
        Self {
            notion: NotionClient::from_config(config),
            projects_database_id: config.projects_database_id.clone(),
            blog_database_id: config.blog_database_id.clone(),
            comments_database_id: config.comments_database_id.clone(),
        }
    }

    /// All projects, newest first.
    pub async fn get_all_projects(&self, filter: &ContentFilter) -> Result<Vec<Project>> {
        let mut query = DatabaseQuery::new();
        if let Some(language) = language_filter(filter) {
            query = query.with_filter(language);
        }

        let pages = self
            .notion
            .query_database(&self.projects_database_id, &query)
            .await
            .context("Failed to fetch projects")?;

        let mut projects = collect_records(&pages, "project", Project::from_page);
        if let Some(locale) = filter.language {
            projects.retain(|project| project.locale == locale);
        }
        projects.sort_by_key(|project| Reverse(project.date));

        info!("Fetched {} projects", projects.len());
        Ok(projects)
    }

    /// All published blog posts, newest first.
    pub async fn get_all_blog_posts(&self, filter: &ContentFilter) -> Result<Vec<BlogPost>> {
        let mut filters = vec![json!({
            "property": records::props::PUBLISHED,
            "checkbox": { "equals": true }
        })];
        filters.extend(language_filter(filter));

        let mut query = DatabaseQuery::new();
        if let Some(combined) = and_filters(filters) {
            query = query.with_filter(combined);
        }

        let pages = self
            .notion
            .query_database(&self.blog_database_id, &query)
            .await
            .context("Failed to fetch blog posts")?;

        let mut posts = collect_records(
            pages
                .iter()
                .filter(|page| page.checkbox(records::props::PUBLISHED)),
            "blog post",
            BlogPost::from_page,
        );
        if let Some(locale) = filter.language {
            posts.retain(|post| post.locale == locale);
        }
        posts.sort_by_key(|post| Reverse(post.published));

        info!("Fetched {} blog posts", posts.len());
        Ok(posts)
    }

    pub async fn get_blog_post_by_slug(&self, locale: Locale, slug: &str) -> Result<Option<BlogPost>> {
        let posts = self
            .get_all_blog_posts(&ContentFilter::language(locale))
            .await?;
        Ok(posts.into_iter().find(|post| post.slug == slug))
    }

    pub async fn get_project_by_slug(&self, locale: Locale, slug: &str) -> Result<Option<Project>> {
        let projects = self
            .get_all_projects(&ContentFilter::language(locale))
            .await?;
        Ok(projects.into_iter().find(|project| project.slug == slug))
    }

    /// Body blocks of a post.
    pub async fn get_post_content(&self, post_id: &str) -> Result<Vec<Block>> {
        self.notion
            .block_children(post_id)
            .await
            .with_context(|| format!("Failed to fetch content for post {}", post_id))
    }

    /// Comments on a post, oldest first.
    pub async fn get_comments_by_post_id(&self, post_id: &str) -> Result<Vec<Comment>> {
        let query = DatabaseQuery::new()
            .with_filter(json!({
                "property": comments::POST_ID_PROPERTY,
                "rich_text": { "equals": post_id }
            }))
            .sort_by_created_time(SortDirection::Ascending);

        let pages = self
            .notion
            .query_database(&self.comments_database_id, &query)
            .await
            .with_context(|| format!("Failed to fetch comments for post {}", post_id))?;

        let mut comments: Vec<Comment> = collect_records(&pages, "comment", Comment::from_page)
            .into_iter()
            .filter(|comment| comment.post_id == post_id)
            .collect();
        comments.sort_by_key(|comment| comment.created_at);

        Ok(comments)
    }

    /// Store a validated comment.
    pub async fn add_comment(&self, comment: &ValidComment) -> Result<Comment> {
        let page = self
            .notion
            .create_page(&self.comments_database_id, comment.to_properties())
            .await
            .context("Failed to create comment")?;

        info!("Added comment {} on post {}", page.id, comment.post_id);

        Ok(Comment {
            id: page.id,
            post_id: comment.post_id.clone(),
            parent_id: comment.parent_id.clone(),
            author: comment.author.clone(),
            content: comment.content.clone(),
            created_at: page.created_time,
        })
    }

    /// Connectivity check: fetch a single row of the projects database.
    pub async fn check_connection(&self) -> Result<usize> {
        let pages = self
            .notion
            .query_database(
                &self.projects_database_id,
                &DatabaseQuery::new().with_page_size(1),
            )
            .await
            .context("Notion projects database is not reachable")?;
        Ok(pages.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use wiremock::{
        matchers::{body_partial_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn test_config(notion_url: &str) -> Config {
        Config {
            notion_api_key: "secret".to_string(),
            notion_api_url: notion_url.to_string(),
            projects_database_id: "projects".to_string(),
            blog_database_id: "blog".to_string(),
            comments_database_id: "comments".to_string(),
            site_url: "https://example.dev".to_string(),
            port: 3000,
        }
    }

    fn post_page(id: &str, title: &str, language: &str, date: &str, published: bool) -> Value {
        json!({
            "id": id,
            "created_time": "2024-01-01T00:00:00.000Z",
            "last_edited_time": "2024-01-02T00:00:00.000Z",
            "properties": {
                "Title": {"type": "title", "title": [{"plain_text": title}]},
                "Language": {"type": "select", "select": {"name": language}},
                "Date": {"type": "date", "date": {"start": date}},
                "Published": {"type": "checkbox", "checkbox": published}
            }
        })
    }

    #[test]
    fn test_language_filter_uses_cms_label() {
        assert_eq!(language_filter(&ContentFilter::default()), None);
        assert_eq!(
            language_filter(&ContentFilter::language(Locale::Chinese)),
            Some(json!({"property": "Language", "select": {"equals": "Chinese"}}))
        );
    }

    #[tokio::test]
    async fn test_blog_posts_sorted_and_unpublished_dropped() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/databases/blog/query"))
            .and(body_partial_json(json!({
                "filter": {"and": [
                    {"property": "Published", "checkbox": {"equals": true}},
                    {"property": "Language", "select": {"equals": "English"}}
                ]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    post_page("p1", "Older", "English", "2023-05-01", true),
                    post_page("p2", "Draft", "English", "2024-06-01", false),
                    post_page("p3", "Newer", "English", "2024-02-01", true),
                    post_page("p4", "Wrong language", "Chinese", "2024-03-01", true)
                ],
                "has_more": false
            })))
            .mount(&mock_server)
            .await;

        let content = ContentClient::new(&test_config(&mock_server.uri()));
        let posts = content
            .get_all_blog_posts(&ContentFilter::language(Locale::English))
            .await
            .unwrap();

        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_get_blog_post_by_slug() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/databases/blog/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [post_page("p1", "Hello World", "Chinese", "2024-01-01", true)],
                "has_more": false
            })))
            .mount(&mock_server)
            .await;

        let content = ContentClient::new(&test_config(&mock_server.uri()));
        let found = content
            .get_blog_post_by_slug(Locale::Chinese, "hello-world")
            .await
            .unwrap();
        assert_eq!(found.map(|p| p.id), Some("p1".to_string()));

        let missing = content
            .get_blog_post_by_slug(Locale::Chinese, "nope")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_add_comment_returns_stored_comment() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "comment-1",
                "created_time": "2024-04-01T10:00:00.000Z",
                "last_edited_time": "2024-04-01T10:00:00.000Z",
                "properties": {}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let content = ContentClient::new(&test_config(&mock_server.uri()));
        let valid = NewComment {
            post_id: Some("post-1".to_string()),
            parent_id: None,
            author: Some(comments::NewCommentAuthor {
                name: Some("Ann".to_string()),
                email: Some("ann@example.com".to_string()),
                website: None,
            }),
            content: Some("Great read".to_string()),
        }
        .validate()
        .unwrap();

        let comment = content.add_comment(&valid).await.unwrap();
        assert_eq!(comment.id, "comment-1");
        assert_eq!(comment.post_id, "post-1");
        assert_eq!(comment.content, "Great read");
    }

    #[tokio::test]
    async fn test_upstream_failure_has_context() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/databases/projects/query"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let content = ContentClient::new(&test_config(&mock_server.uri()));
        let err = content
            .get_all_projects(&ContentFilter::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to fetch projects"));
    }
}
