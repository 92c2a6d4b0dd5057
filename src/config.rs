use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Notion
    pub notion_api_key: String,
    pub notion_api_url: String,
    pub projects_database_id: String,
    pub blog_database_id: String,
    pub comments_database_id: String,

    // Site
    pub site_url: String,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Notion - integration token
            notion_api_key: std::env::var("NOTION_API_KEY")
                .context("NOTION_API_KEY not set")?,
            notion_api_url: std::env::var("NOTION_API_URL")
                .unwrap_or_else(|_| "https://api.notion.com/v1".to_string()),
            projects_database_id: std::env::var("NOTION_PROJECTS_DATABASE_ID")
                .context("NOTION_PROJECTS_DATABASE_ID not set")?,
            blog_database_id: std::env::var("NOTION_BLOG_DATABASE_ID")
                .context("NOTION_BLOG_DATABASE_ID not set")?,
            comments_database_id: std::env::var("NOTION_COMMENTS_DATABASE_ID")
                .context("NOTION_COMMENTS_DATABASE_ID not set")?,

            // Public site URL, used for sitemap and canonical links
            site_url: std::env::var("NEXT_PUBLIC_SITE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),

            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "NOTION_API_KEY",
        "NOTION_API_URL",
        "NOTION_PROJECTS_DATABASE_ID",
        "NOTION_BLOG_DATABASE_ID",
        "NOTION_COMMENTS_DATABASE_ID",
        "NEXT_PUBLIC_SITE_URL",
        "PORT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    fn set_required() {
        std::env::set_var("NOTION_API_KEY", "secret_test");
        std::env::set_var("NOTION_PROJECTS_DATABASE_ID", "projects-db");
        std::env::set_var("NOTION_BLOG_DATABASE_ID", "blog-db");
        std::env::set_var("NOTION_COMMENTS_DATABASE_ID", "comments-db");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        set_required();

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.notion_api_key, "secret_test");
        assert_eq!(config.notion_api_url, "https://api.notion.com/v1");
        assert_eq!(config.blog_database_id, "blog-db");
        assert_eq!(config.site_url, "http://localhost:3000");
        assert_eq!(config.port, 3000);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        set_required();
        std::env::set_var("NEXT_PUBLIC_SITE_URL", "https://example.dev/");
        std::env::set_var("PORT", "8080");
        std::env::set_var("NOTION_API_URL", "http://127.0.0.1:9999");

        let config = Config::from_env().unwrap();
        assert_eq!(config.site_url, "https://example.dev");
        assert_eq!(config.port, 8080);
        assert_eq!(config.notion_api_url, "http://127.0.0.1:9999");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_port_falls_back() {
        clear_env();
        set_required();
        std::env::set_var("PORT", "not-a-port");

        assert_eq!(Config::from_env().unwrap().port, 3000);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_api_key() {
        clear_env();
        set_required();
        std::env::remove_var("NOTION_API_KEY");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("NOTION_API_KEY"));

        clear_env();
    }
}
