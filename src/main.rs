use anyhow::Result;
use tracing::{info, warn};
use travel_blog::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("travel_blog=info".parse()?),
        )
        .init();

    info!("Starting travel blog service");

    let config = Config::from_env()?;
    info!("CMS: {}", config.cms_base_url);

    if config.cms_api_token.is_none() {
        warn!("CMS_API_TOKEN not set, every content request will fail");
    }
    if config.test_mode {
        warn!("TEST_MODE enabled, CAPTCHA verification is skipped");
    }

    travel_blog::server::serve(config).await
}
