use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::sheets::PostStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Model client. Default: GeminiClient.
    pub llm: Arc<dyn TextGenerator>,
    /// Post table. Default: SheetsPostStore over the `Posts` tab.
    pub store: Arc<dyn PostStore>,
    /// Author, topic pools, photo catalog and batch pacing.
    pub catalog: Arc<Catalog>,
}

#[cfg(test)]
pub(crate) fn test_config(cron_secret: Option<&str>) -> Config {
    use crate::config::SheetsConfig;

    Config {
        gemini_api_key: Some("test-key".to_string()),
        gemini_model: "gemini-flash-latest".to_string(),
        sheets: SheetsConfig {
            client_email: "svc@example.iam.gserviceaccount.com".to_string(),
            private_key: String::new(),
            spreadsheet_id: "test-sheet".to_string(),
        },
        cron_secret: cron_secret.map(str::to_string),
        port: 0,
        rust_log: "warn".to_string(),
    }
}

#[cfg(test)]
pub(crate) fn test_state(llm: Arc<dyn TextGenerator>, store: Arc<dyn PostStore>) -> AppState {
    AppState {
        config: test_config(None),
        llm,
        store,
        catalog: Arc::new(Catalog::default()),
    }
}
