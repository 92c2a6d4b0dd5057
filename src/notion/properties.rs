//! Typed view over Notion page payloads.
//!
//! Notion returns every property as `{"type": "<kind>", "<kind>": ...}`.
//! [`PropertyValue`] mirrors that as an internally tagged enum so property
//! kinds we do not model collapse into [`PropertyValue::Unsupported`]
//! instead of failing the whole page.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub code: bool,
}

/// A rich text run.
#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub annotations: Annotations,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}

/// Location of a hosted or external file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileUrl {
    pub url: String,
    /// Present on Notion-hosted files, whose signed URLs expire
    #[serde(default)]
    pub expiry_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileObject {
    External { external: FileUrl },
    File { file: FileUrl },
}

impl FileObject {
    pub fn url(&self) -> &str {
        match self {
            FileObject::External { external } => &external.url,
            FileObject::File { file } => &file.url,
        }
    }
}

/// A single page property.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Select {
        #[serde(default)]
        select: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    Date {
        #[serde(default)]
        date: Option<DateValue>,
    },
    Url {
        #[serde(default)]
        url: Option<String>,
    },
    Email {
        #[serde(default)]
        email: Option<String>,
    },
    Checkbox {
        #[serde(default)]
        checkbox: bool,
    },
    Number {
        #[serde(default)]
        number: Option<f64>,
    },
    Files {
        #[serde(default)]
        files: Vec<FileObject>,
    },
    CreatedTime {
        created_time: DateTime<Utc>,
    },
    #[serde(other)]
    Unsupported,
}

/// A database row.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    pub created_time: DateTime<Utc>,
    pub last_edited_time: DateTime<Utc>,
    #[serde(default)]
    pub cover: Option<FileObject>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// Concatenate rich text runs into plain text.
pub fn plain_text(runs: &[RichText]) -> String {
    runs.iter().map(|run| run.plain_text.as_str()).collect()
}

impl Page {
    /// Text of a title or rich text property, trimmed; `None` when blank.
    pub fn text(&self, name: &str) -> Option<String> {
        let text = match self.properties.get(name)? {
            PropertyValue::Title { title } => plain_text(title),
            PropertyValue::RichText { rich_text } => plain_text(rich_text),
            _ => return None,
        };
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    pub fn select(&self, name: &str) -> Option<&str> {
        match self.properties.get(name)? {
            PropertyValue::Select {
                select: Some(option),
            } => Some(option.name.as_str()),
            _ => None,
        }
    }

    pub fn multi_select(&self, name: &str) -> Vec<String> {
        match self.properties.get(name) {
            Some(PropertyValue::MultiSelect { multi_select }) => {
                multi_select.iter().map(|option| option.name.clone()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Start of a date property. Accepts both date-only and date-time values.
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.properties.get(name)? {
            PropertyValue::Date { date: Some(value) } => parse_date(&value.start),
            _ => None,
        }
    }

    pub fn url(&self, name: &str) -> Option<String> {
        match self.properties.get(name)? {
            PropertyValue::Url { url: Some(url) } if !url.trim().is_empty() => {
                Some(url.trim().to_string())
            }
            _ => None,
        }
    }

    pub fn email(&self, name: &str) -> Option<String> {
        match self.properties.get(name)? {
            PropertyValue::Email { email: Some(email) } => Some(email.clone()),
            // Comment databases often store the address as plain text
            PropertyValue::RichText { .. } => self.text(name),
            _ => None,
        }
    }

    pub fn checkbox(&self, name: &str) -> bool {
        matches!(
            self.properties.get(name),
            Some(PropertyValue::Checkbox { checkbox: true })
        )
    }

    /// URL of the page cover, falling back to the first file of `files_property`.
    pub fn cover_url(&self, files_property: &str) -> Option<String> {
        if let Some(cover) = &self.cover {
            return Some(cover.url().to_string());
        }
        match self.properties.get(files_property)? {
            PropertyValue::Files { files } => files.first().map(|f| f.url().to_string()),
            _ => None,
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_page() -> Page {
        serde_json::from_value(json!({
            "object": "page",
            "id": "page-1",
            "created_time": "2024-03-01T08:00:00.000Z",
            "last_edited_time": "2024-03-02T09:30:00.000Z",
            "cover": {"type": "external", "external": {"url": "https://img.example.com/c.png"}},
            "archived": false,
            "properties": {
                "Title": {"id": "title", "type": "title", "title": [
                    {"plain_text": "Hello ", "href": null},
                    {"plain_text": "World", "href": null}
                ]},
                "Slug": {"id": "a", "type": "rich_text", "rich_text": []},
                "Language": {"id": "b", "type": "select", "select": {"name": "Chinese", "color": "red"}},
                "Tags": {"id": "c", "type": "multi_select", "multi_select": [{"name": "rust"}, {"name": "web"}]},
                "Date": {"id": "d", "type": "date", "date": {"start": "2024-02-28", "end": null}},
                "Published": {"id": "e", "type": "checkbox", "checkbox": true},
                "Link": {"id": "f", "type": "url", "url": "https://example.com"},
                "Owner": {"id": "g", "type": "people", "people": []},
                "Rollup": {"id": "h", "type": "rollup", "rollup": {"type": "number", "number": 3}}
            }
        }))
        .expect("sample page should parse")
    }

    #[test]
    fn test_text_concatenates_runs() {
        let page = sample_page();
        assert_eq!(page.text("Title"), Some("Hello World".to_string()));
    }

    #[test]
    fn test_blank_text_is_none() {
        let page = sample_page();
        assert_eq!(page.text("Slug"), None);
        assert_eq!(page.text("Missing"), None);
    }

    #[test]
    fn test_unknown_property_kinds_are_unsupported() {
        let page = sample_page();
        assert!(matches!(
            page.properties.get("Owner"),
            Some(PropertyValue::Unsupported)
        ));
        assert!(matches!(
            page.properties.get("Rollup"),
            Some(PropertyValue::Unsupported)
        ));
    }

    #[test]
    fn test_select_multi_select_checkbox_url() {
        let page = sample_page();
        assert_eq!(page.select("Language"), Some("Chinese"));
        assert_eq!(page.multi_select("Tags"), vec!["rust", "web"]);
        assert!(page.checkbox("Published"));
        assert!(!page.checkbox("Missing"));
        assert_eq!(page.url("Link"), Some("https://example.com".to_string()));
    }

    #[test]
    fn test_date_accepts_date_and_datetime() {
        let page = sample_page();
        assert_eq!(page.date("Date"), NaiveDate::from_ymd_opt(2024, 2, 28));
        assert_eq!(
            parse_date("2024-01-15T23:30:00.000+08:00"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_cover_url_prefers_cover() {
        let page = sample_page();
        assert_eq!(
            page.cover_url("Image"),
            Some("https://img.example.com/c.png".to_string())
        );
    }

    #[test]
    fn test_hosted_file_carries_expiry() {
        let file: FileObject = serde_json::from_value(json!({
            "type": "file",
            "file": {"url": "https://s3.example.com/a.png?X-Amz-Expires=3600", "expiry_time": "2024-03-01T09:00:00.000Z"}
        }))
        .unwrap();
        match file {
            FileObject::File { file } => assert!(file.expiry_time.is_some()),
            FileObject::External { .. } => panic!("expected hosted file"),
        }
    }
}
