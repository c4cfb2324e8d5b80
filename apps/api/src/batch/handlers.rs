//! Axum route handler for the weekly batch endpoint.

use axum::{extract::State, http::HeaderMap, Json};
use subtle::ConstantTimeEq;

use crate::batch::scheduler::{run_batch, select_topics, BatchReport};
use crate::config::Config;
use crate::errors::AppError;
use crate::state::AppState;

/// Header carrying the shared cron secret.
pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// GET /api/generate-weekly-blogs
///
/// Generates `batch_size` posts from randomly drawn topics, one after another.
/// Individual topic failures are reported in `results`, not as an error status.
pub async fn handle_generate_weekly_blogs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<BatchReport>, AppError> {
    authorize_cron(&state.config, &headers)?;

    let topics = {
        let mut rng = rand::thread_rng();
        select_topics(&state.catalog, state.catalog.batch_size, &mut rng)
    };

    Ok(Json(run_batch(&state, topics).await))
}

/// Passes when no secret is configured; otherwise the header must match exactly.
fn authorize_cron(config: &Config, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(expected) = config.cron_secret.as_deref() else {
        return Ok(());
    };

    let provided = headers
        .get(CRON_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if constant_time_compare(provided, expected) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
