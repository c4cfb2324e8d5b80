//! Axum route handlers for the Read API.

use std::collections::BTreeSet;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::post::{sort_newest_first, BlogPost};
use crate::state::AppState;

/// Every stored post, newest first.
async fn load_posts(state: &AppState) -> Result<Vec<BlogPost>, AppError> {
    let rows = state
        .store
        .list_rows()
        .await
        .map_err(|e| AppError::Fetch(e.to_string()))?;

    let mut posts: Vec<BlogPost> = rows
        .iter()
        .map(|row| BlogPost::from_row(row, &state.catalog.author))
        .collect();
    sort_newest_first(&mut posts);
    Ok(posts)
}

/// GET /api/posts
pub async fn handle_list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogPost>>, AppError> {
    let posts = load_posts(&state).await?;
    Ok(Json(posts))
}

/// GET /api/posts/:slug
pub async fn handle_get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    let posts = load_posts(&state).await?;
    posts
        .into_iter()
        .find(|p| p.slug == slug)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Post '{slug}' not found")))
}

/// GET /api/tags
///
/// Unique tags across all posts, sorted.
pub async fn handle_list_tags(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let posts = load_posts(&state).await?;
    let tags: BTreeSet<String> = posts.into_iter().flat_map(|p| p.tags).collect();
    Ok(Json(tags.into_iter().collect()))
}
