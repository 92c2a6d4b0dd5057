//! Notion block children, the body of a blog post.

use crate::notion::properties::{FileUrl, RichText};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageBlock {
    #[serde(default)]
    pub external: Option<FileUrl>,
    #[serde(default)]
    pub file: Option<FileUrl>,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

impl ImageBlock {
    pub fn source(&self) -> Option<&FileUrl> {
        self.file.as_ref().or(self.external.as_ref())
    }
}

/// The block kinds rendered in a post body.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        paragraph: TextBlock,
    },
    #[serde(rename = "heading_1")]
    Heading1 {
        heading_1: TextBlock,
    },
    #[serde(rename = "heading_2")]
    Heading2 {
        heading_2: TextBlock,
    },
    #[serde(rename = "heading_3")]
    Heading3 {
        heading_3: TextBlock,
    },
    BulletedListItem {
        bulleted_list_item: TextBlock,
    },
    NumberedListItem {
        numbered_list_item: TextBlock,
    },
    Quote {
        quote: TextBlock,
    },
    Code {
        code: CodeBlock,
    },
    Image {
        image: ImageBlock,
    },
    Divider,
    #[serde(other)]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_heading_and_list_blocks() {
        let heading: Block = serde_json::from_value(json!({
            "object": "block",
            "id": "b1",
            "type": "heading_2",
            "heading_2": {"rich_text": [{"plain_text": "Intro"}], "is_toggleable": false}
        }))
        .unwrap();
        assert!(matches!(heading, Block::Heading2 { .. }));

        let item: Block = serde_json::from_value(json!({
            "type": "numbered_list_item",
            "numbered_list_item": {"rich_text": [{"plain_text": "one"}]}
        }))
        .unwrap();
        assert!(matches!(item, Block::NumberedListItem { .. }));
    }

    #[test]
    fn test_divider_and_unknown_blocks() {
        let divider: Block =
            serde_json::from_value(json!({"type": "divider", "divider": {}})).unwrap();
        assert!(matches!(divider, Block::Divider));

        let table: Block =
            serde_json::from_value(json!({"type": "table", "table": {"table_width": 2}}))
                .unwrap();
        assert!(matches!(table, Block::Unsupported));
    }

    #[test]
    fn test_image_source_prefers_hosted_file() {
        let block: Block = serde_json::from_value(json!({
            "type": "image",
            "image": {
                "type": "file",
                "file": {"url": "https://s3.example.com/x.png", "expiry_time": "2024-01-01T00:00:00.000Z"},
                "caption": [{"plain_text": "A chart"}]
            }
        }))
        .unwrap();
        match block {
            Block::Image { image } => {
                assert_eq!(image.source().unwrap().url, "https://s3.example.com/x.png");
                assert_eq!(image.caption[0].plain_text, "A chart");
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_code_block_language() {
        let block: Block = serde_json::from_value(json!({
            "type": "code",
            "code": {"rich_text": [{"plain_text": "fn main() {}"}], "language": "rust"}
        }))
        .unwrap();
        match block {
            Block::Code { code } => assert_eq!(code.language, "rust"),
            other => panic!("expected code, got {:?}", other),
        }
    }
}
