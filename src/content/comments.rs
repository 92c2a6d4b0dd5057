//! Blog comments: submission validation, Notion mapping and threading.

use crate::content::records::{require_text, RecordError};
use crate::notion::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Notion caps a single rich text run at 2000 characters
const MAX_RICH_TEXT_RUN: usize = 2000;

mod props {
    pub const AUTHOR: &str = "Author";
    pub const EMAIL: &str = "Email";
    pub const WEBSITE: &str = "Website";
    pub const CONTENT: &str = "Content";
    pub const POST_ID: &str = "PostId";
    pub const PARENT_ID: &str = "ParentId";
}

pub const POST_ID_PROPERTY: &str = props::POST_ID;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    pub name: String,
    #[serde(skip_serializing)]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub parent_id: Option<String>,
    pub author: CommentAuthor,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn from_page(page: &Page) -> Result<Comment, RecordError> {
        Ok(Comment {
            id: page.id.clone(),
            post_id: require_text(page, props::POST_ID)?,
            parent_id: page.text(props::PARENT_ID),
            author: CommentAuthor {
                name: require_text(page, props::AUTHOR)?,
                email: page.email(props::EMAIL).unwrap_or_default(),
                website: page.url(props::WEBSITE),
            },
            content: require_text(page, props::CONTENT)?,
            created_at: page.created_time,
        })
    }
}

/// Rejection reasons for a comment submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommentValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCommentAuthor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Comment submission as posted by the browser.
///
/// Every field is optional at the wire level so that a missing field is
/// reported by [`NewComment::validate`] rather than as a JSON error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub author: Option<NewCommentAuthor>,
    #[serde(default)]
    pub content: Option<String>,
}

/// A submission that passed validation. Only this type can be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidComment {
    pub post_id: String,
    pub parent_id: Option<String>,
    pub author: CommentAuthor,
    pub content: String,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, CommentValidationError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(CommentValidationError::MissingField(field))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl NewComment {
    pub fn validate(self) -> Result<ValidComment, CommentValidationError> {
        let post_id = required(self.post_id, "postId")?;
        let author = self.author.unwrap_or_default();
        let name = required(author.name, "author.name")?;
        let email = required(author.email, "author.email")?;
        let content = required(self.content, "content")?;

        Ok(ValidComment {
            post_id,
            parent_id: optional(self.parent_id),
            author: CommentAuthor {
                name,
                email,
                website: optional(author.website),
            },
            content,
        })
    }
}

impl ValidComment {
    /// Notion page properties for the comments database.
    pub fn to_properties(&self) -> Value {
        let mut properties = json!({
            (props::AUTHOR): { "title": text_runs(&self.author.name) },
            (props::EMAIL): { "email": self.author.email },
            (props::CONTENT): { "rich_text": text_runs(&self.content) },
            (props::POST_ID): { "rich_text": text_runs(&self.post_id) },
        });

        if let Some(parent_id) = &self.parent_id {
            properties[props::PARENT_ID] = json!({ "rich_text": text_runs(parent_id) });
        }
        if let Some(website) = &self.author.website {
            properties[props::WEBSITE] = json!({ "url": website });
        }

        properties
    }
}

/// Split text into rich text runs that fit Notion's per-run limit.
fn text_runs(text: &str) -> Vec<Value> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(MAX_RICH_TEXT_RUN)
        .map(|chunk| {
            let content: String = chunk.iter().collect();
            json!({ "type": "text", "text": { "content": content } })
        })
        .collect()
}

/// A top-level comment with its direct replies.
#[derive(Debug)]
pub struct CommentThread<'a> {
    pub comment: &'a Comment,
    pub replies: Vec<&'a Comment>,
}

/// Group comments one level deep, preserving order.
///
/// Replies whose parent is unknown (deleted, or itself a reply) are shown as
/// top-level comments.
pub fn thread_comments(comments: &[Comment]) -> Vec<CommentThread<'_>> {
    let top_level: HashSet<&str> = comments
        .iter()
        .filter(|c| c.parent_id.is_none())
        .map(|c| c.id.as_str())
        .collect();

    let mut replies: HashMap<&str, Vec<&Comment>> = HashMap::new();
    let mut roots = Vec::new();
    for comment in comments {
        match comment.parent_id.as_deref() {
            Some(parent) if top_level.contains(parent) => {
                replies.entry(parent).or_default().push(comment)
            }
            _ => roots.push(comment),
        }
    }

    roots
        .into_iter()
        .map(|root| CommentThread {
            comment: root,
            replies: replies.remove(root.id.as_str()).unwrap_or_default(),
        })
        .collect()
}
