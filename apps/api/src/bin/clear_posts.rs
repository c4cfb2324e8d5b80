//! Maintenance: removes every post row from the `Posts` sheet, keeping the header.
//!
//! Usage: `cargo run --bin clear-posts`

use anyhow::{bail, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blog_api::config::Config;
use blog_api::sheets::{PostStore, SheetsPostStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("clear_posts={0},blog_api={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = SheetsPostStore::new(&config.sheets)?;

    let cleared = store.clear_rows().await?;
    if cleared == 0 {
        info!("No posts found to clear (only headers or empty sheet)");
        return Ok(());
    }
    info!("Cleared {cleared} posts; header row preserved");

    let remaining = store.list_rows().await?.len();
    if remaining > 0 {
        bail!("{remaining} rows still remain after clearing");
    }
    info!("Verified: sheet holds only the header row");

    Ok(())
}
