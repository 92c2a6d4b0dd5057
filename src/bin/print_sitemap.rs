//! Sitemap binary - generates the sitemap from Notion without starting the server
//!
//! Usage:
//!   cargo run --bin sitemap                       # Print sitemap.xml to stdout
//!   cargo run --bin sitemap -- --json             # Print entries as JSON
//!   cargo run --bin sitemap -- --out public/sitemap.xml
//!
//! Required environment variables:
//! - NOTION_API_KEY
//! - NOTION_PROJECTS_DATABASE_ID, NOTION_BLOG_DATABASE_ID, NOTION_COMMENTS_DATABASE_ID
//!
//! Optional:
//! - NEXT_PUBLIC_SITE_URL (defaults to http://localhost:3000)

use anyhow::{Context, Result};
use notion_portfolio::{config, content::ContentClient, sitemap};
use std::fs;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays clean for the sitemap itself
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notion_portfolio=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let as_json = args.iter().any(|a| a == "--json");
    let output_path = args
        .iter()
        .position(|a| a == "--out")
        .map(|i| args.get(i + 1).context("--out requires a path"))
        .transpose()?;

    let config = config::Config::from_env()?;
    let content = ContentClient::new(&config);

    let entries = sitemap::generate(&content, &config.site_url).await?;
    let rendered = if as_json {
        serde_json::to_string_pretty(&entries).context("Failed to serialize sitemap entries")?
    } else {
        sitemap::render_xml(&entries)
    };

    match output_path {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("Failed to write {}", path))?;
            info!("✓ Wrote {} sitemap entries to {}", entries.len(), path);
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
