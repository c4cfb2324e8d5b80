//! Maintenance: generates and stores one post outside the HTTP API, e.g. to
//! retry a topic that failed in a weekly batch.
//!
//! Usage: `cargo run --bin generate-post -- "<topic>" [programming|cybersecurity]`

use anyhow::{anyhow, bail, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blog_api::catalog::Catalog;
use blog_api::config::Config;
use blog_api::errors::AppError;
use blog_api::generation::generator::{generate_post, GenerateRequest};
use blog_api::llm_client::GeminiClient;
use blog_api::sheets::SheetsPostStore;

const USAGE: &str = "usage: generate-post <topic> [category]";

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<GenerateRequest> {
    let mut args = args.into_iter();
    let topic = args
        .next()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| anyhow!(USAGE))?;
    let category = args.next();
    if args.next().is_some() {
        bail!("{USAGE} (quote topics that contain spaces)");
    }
    Ok(GenerateRequest {
        topic: Some(topic),
        category,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let request = parse_args(std::env::args().skip(1))?;
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("generate_post={0},blog_api={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let llm = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    let store = SheetsPostStore::new(&config.sheets)?;
    let catalog = Catalog::default();

    match generate_post(&llm, &store, &catalog, &request).await {
        Ok(post) => {
            info!("Saved '{}' as /{}", post.title, post.slug);
            Ok(())
        }
        Err(e) => {
            let err = AppError::from(e);
            let (_, summary, details) = err.parts();
            match details {
                Some(details) => bail!("{summary}: {details}"),
                None => bail!("{summary}"),
            }
        }
    }
}
