use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blog_api::catalog::Catalog;
use blog_api::config::Config;
use blog_api::llm_client::GeminiClient;
use blog_api::routes::build_router;
use blog_api::sheets::SheetsPostStore;
use blog_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing spreadsheet credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("blog_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Blog API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Gemini client
    let llm = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; generation requests will fail with 500");
    }
    info!("LLM client initialized (model: {})", llm.model());

    // Initialize spreadsheet store
    let store = SheetsPostStore::new(&config.sheets)?;
    info!("Sheets store initialized (spreadsheet: {})", config.sheets.spreadsheet_id);

    if config.cron_secret.is_none() {
        warn!("CRON_SECRET is not set; the weekly batch endpoint is unauthenticated");
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm: Arc::new(llm),
        store: Arc::new(store),
        catalog: Arc::new(Catalog::default()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
