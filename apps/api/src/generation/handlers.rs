//! Axum route handlers for the Generation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::generator::{generate_post, GenerateRequest};
use crate::models::post::BlogPost;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateBlogResponse {
    pub success: bool,
    pub post: BlogPost,
    pub message: String,
}

/// POST /api/generate-blog
///
/// Generates one post for `topic` and appends it to the store.
pub async fn handle_generate_blog(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateBlogResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    run_generation(&state, &request).await.map(Json)
}

/// Shared by the HTTP handler and the batch scheduler.
pub async fn run_generation(
    state: &AppState,
    request: &GenerateRequest,
) -> Result<GenerateBlogResponse, AppError> {
    let post = generate_post(
        state.llm.as_ref(),
        state.store.as_ref(),
        &state.catalog,
        request,
    )
    .await?;

    Ok(GenerateBlogResponse {
        success: true,
        post,
        message: "Blog post generated and saved successfully".to_string(),
    })
}
