//! JSON API routes.
//!
//! ## Endpoints
//! - GET  /api/projects?language= - Projects, optionally narrowed to one locale
//! - GET  /api/posts?language=    - Published blog posts
//! - GET  /api/comments?postId=   - Comments on a post
//! - POST /api/comments           - Submit a comment
//! - GET  /api/test               - Notion connectivity check

use crate::content::{BlogPost, Comment, ContentFilter, NewComment, Project};
use crate::error::ApiError;
use crate::i18n::Locale;
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

#[derive(Debug, Default, Deserialize)]
pub struct LanguageQuery {
    pub language: Option<String>,
}

impl LanguageQuery {
    fn filter(&self) -> Result<ContentFilter, ApiError> {
        match self.language.as_deref().map(str::trim) {
            None | Some("") => Ok(ContentFilter::default()),
            Some(value) => Locale::parse_filter(value)
                .map(ContentFilter::language)
                .map_err(|e| ApiError::Validation(e.to_string())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsQuery {
    pub post_id: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects))
        .route("/api/posts", get(list_posts))
        .route("/api/comments", get(list_comments).post(create_comment))
        .route("/api/test", get(test_connection))
}

/// GET /api/projects
async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let filter = query.filter()?;
    let projects = state.content.get_all_projects(&filter).await?;
    Ok(Json(projects))
}

/// GET /api/posts
async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<Vec<BlogPost>>, ApiError> {
    let filter = query.filter()?;
    let posts = state.content.get_all_blog_posts(&filter).await?;
    Ok(Json(posts))
}

/// GET /api/comments
async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentsQuery>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let post_id = query
        .post_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing required field: postId".to_string()))?;

    let comments = state.content.get_comments_by_post_id(post_id).await?;
    Ok(Json(comments))
}

/// POST /api/comments
///
/// Validation runs before anything is sent to Notion.
async fn create_comment(
    State(state): State<AppState>,
    payload: Result<Json<NewComment>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let Json(submission) = payload.map_err(|rejection| {
        ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    let comment = submission.validate()?;

    let stored = state.content.add_comment(&comment).await?;
    info!("Comment {} stored for post {}", stored.id, stored.post_id);

    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/test
async fn test_connection(State(state): State<AppState>) -> Response {
    match state.content.check_connection().await {
        Ok(rows) => Json(json!({
            "success": true,
            "message": "Notion connection OK",
            "sampleCount": rows,
        }))
        .into_response(),
        Err(e) => {
            error!("Notion connectivity check failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_query_filter() {
        let empty = LanguageQuery::default();
        assert_eq!(empty.filter().unwrap(), ContentFilter::default());

        let blank = LanguageQuery {
            language: Some("  ".to_string()),
        };
        assert_eq!(blank.filter().unwrap(), ContentFilter::default());

        let chinese = LanguageQuery {
            language: Some("Chinese".to_string()),
        };
        assert_eq!(
            chinese.filter().unwrap(),
            ContentFilter::language(Locale::Chinese)
        );

        let bad = LanguageQuery {
            language: Some("Martian".to_string()),
        };
        assert!(matches!(bad.filter(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_comments_query_camel_case() {
        let query: CommentsQuery = serde_json::from_str(r#"{"postId": "abc"}"#).unwrap();
        assert_eq!(query.post_id.as_deref(), Some("abc"));
    }
}
