use anyhow::{Context, Result};

/// Default Gemini model used for post generation.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";

/// Application configuration loaded from environment variables.
/// Fails at startup if the spreadsheet credentials are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional so a missing key surfaces as a per-request 500 rather than a boot failure.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub sheets: SheetsConfig,
    /// Shared secret expected in `x-cron-secret` on the weekly batch endpoint.
    pub cron_secret: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

/// Service-account credentials and target spreadsheet for the post store.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub client_email: String,
    pub private_key: String,
    pub spreadsheet_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            sheets: SheetsConfig {
                client_email: require_env("GOOGLE_SHEETS_CLIENT_EMAIL")?,
                private_key: unescape_private_key(&require_env("GOOGLE_SHEETS_PRIVATE_KEY")?),
                spreadsheet_id: require_env("GOOGLE_SHEETS_ID")?,
            },
            cron_secret: optional_env("CRON_SECRET"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats unset and blank variables the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// PEM keys pasted into a single-line env var carry literal `\n` sequences.
fn unescape_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}
