//! Notion API client and payload types.
//!
//! - `client`: HTTP client for database queries, page creation and block children
//! - `properties`: Tagged-variant parsing of page properties
//! - `blocks`: Tagged-variant parsing of page body blocks

pub mod blocks;
pub mod client;
pub mod properties;

pub use blocks::Block;
pub use client::{and_filters, DatabaseQuery, NotionClient, SortDirection, NOTION_VERSION};
pub use properties::{plain_text, FileObject, Page, PropertyValue, RichText};
