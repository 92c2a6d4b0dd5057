//! Bilingual (English/Chinese) portfolio and blog served from Notion.

pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod i18n;
pub mod middleware;
pub mod notion;
pub mod pages;
pub mod server;
pub mod sitemap;
pub mod widgets;
