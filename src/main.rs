use anyhow::Result;
use notion_portfolio::{config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notion_portfolio=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!("Starting portfolio server");

    // Load configuration from environment
    let config = config::Config::from_env()?;
    info!("Public site URL: {}", config.site_url);

    server::serve(config).await
}
