pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::batch::handlers as batch;
use crate::generation::handlers as generation;
use crate::posts::handlers as posts;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation
        .route("/api/generate-blog", post(generation::handle_generate_blog))
        .route(
            "/api/generate-weekly-blogs",
            get(batch::handle_generate_weekly_blogs),
        )
        // Read API
        .route("/api/posts", get(posts::handle_list_posts))
        .route("/api/posts/:slug", get(posts::handle_get_post))
        .route("/api/tags", get(posts::handle_list_tags))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::generation::generator::test_support::ScriptedGenerator;
    use crate::sheets::memory::MemoryStore;
    use crate::state::test_state;

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state(
            Arc::new(ScriptedGenerator::new(vec![])),
            Arc::new(MemoryStore::new()),
        ));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
