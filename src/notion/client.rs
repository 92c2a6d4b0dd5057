use crate::config::Config;
use crate::notion::blocks::Block;
use crate::notion::properties::Page;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Notion API version sent with every request
pub const NOTION_VERSION: &str = "2022-06-28";

/// Largest page size Notion accepts
const PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Sort {
    Property {
        property: String,
        direction: SortDirection,
    },
    Timestamp {
        timestamp: &'static str,
        direction: SortDirection,
    },
}

/// Body of a `databases/{id}/query` request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatabaseQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl DatabaseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort_by_property(mut self, property: &str, direction: SortDirection) -> Self {
        self.sorts.push(Sort::Property {
            property: property.to_string(),
            direction,
        });
        self
    }

    pub fn sort_by_created_time(mut self, direction: SortDirection) -> Self {
        self.sorts.push(Sort::Timestamp {
            timestamp: "created_time",
            direction,
        });
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Combine filters with `and`, skipping the wrapper for a single filter.
pub fn and_filters(mut filters: Vec<Value>) -> Option<Value> {
    match filters.len() {
        0 => None,
        1 => filters.pop(),
        _ => Some(serde_json::json!({ "and": filters })),
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Thin typed client for the Notion REST API
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NotionClient {
    pub fn new(api_key: &str, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.notion_api_key, &config.notion_api_url)
    }

    /// Query a database, following pagination until exhausted.
    ///
    /// Rows that do not parse as pages are logged and skipped.
    pub async fn query_database(&self, database_id: &str, query: &DatabaseQuery) -> Result<Vec<Page>> {
        let url = format!("{}/databases/{}/query", self.base_url, database_id);
        let mut query = query.clone();
        let single_page = query.page_size.is_some();
        if query.page_size.is_none() {
            query.page_size = Some(PAGE_SIZE);
        }

        let mut pages = Vec::new();
        loop {
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .header("Notion-Version", NOTION_VERSION)
                .json(&query)
                .send()
                .await
                .context("Failed to send request to Notion API")?;

            let list: ListResponse = parse_response(response).await?;
            pages.extend(list.results.into_iter().filter_map(parse_page));

            match list.next_cursor {
                Some(cursor) if list.has_more && !single_page => {
                    debug!("Fetching next page of database {}", database_id);
                    query.start_cursor = Some(cursor);
                }
                _ => break,
            }
        }

        Ok(pages)
    }

    /// Create a page in a database and return it.
    pub async fn create_page(&self, database_id: &str, properties: Value) -> Result<Page> {
        let url = format!("{}/pages", self.base_url);
        let body = serde_json::json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Notion API")?;

        parse_response(response).await
    }

    /// All top-level child blocks of a page.
    pub async fn block_children(&self, block_id: &str) -> Result<Vec<Block>> {
        let url = format!("{}/blocks/{}/children", self.base_url, block_id);
        let mut cursor: Option<String> = None;
        let mut blocks = Vec::new();

        loop {
            let mut request = self
                .http
                .get(&url)
                .bearer_auth(&self.api_key)
                .header("Notion-Version", NOTION_VERSION)
                .query(&[("page_size", PAGE_SIZE.to_string())]);
            if let Some(cursor) = &cursor {
                request = request.query(&[("start_cursor", cursor)]);
            }

            let response = request
                .send()
                .await
                .context("Failed to send request to Notion API")?;
            let list: ListResponse = parse_response(response).await?;

            blocks.extend(list.results.into_iter().filter_map(|value| {
                serde_json::from_value::<Block>(value)
                    .map_err(|e| warn!("Skipping malformed block in {}: {}", block_id, e))
                    .ok()
            }));

            match list.next_cursor {
                Some(next) if list.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(blocks)
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Notion API error ({}): {}", status, body);
    }

    response
        .json()
        .await
        .context("Failed to parse Notion response")
}

fn parse_page(value: Value) -> Option<Page> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string();
    match serde_json::from_value::<Page>(value) {
        Ok(page) if page.archived => None,
        Ok(page) => Some(page),
        Err(e) => {
            warn!("Skipping malformed Notion page {}: {}", id, e);
            None
        }
    }
}
