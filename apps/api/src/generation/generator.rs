//! Blog generation: orchestrates one topic into one persisted post.
//!
//! Flow: validate → build prompt → model call → parse (one repair) → slug →
//!       existence check → image selection → ensure sheet → append row.
//!
//! Nothing here retries. The existence check and the append are separate
//! remote calls, so two concurrent generations of the same title can both
//! pass the check.

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::generation::draft::{parse_draft, DraftParseError};
use crate::generation::image::select_image_url;
use crate::generation::prompts::{build_blog_prompt, build_system};
use crate::generation::slug::slugify;
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::post::BlogPost;
use crate::sheets::{PostStore, StoreError};

/// Category used when the request does not name one.
pub const DEFAULT_CATEGORY: &str = "programming";

/// Request body for `POST /api/generate-blog`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    /// Absent and `null` both count as missing.
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Topic is required")]
    MissingInput,

    #[error("GEMINI_API_KEY is not configured")]
    MissingConfiguration,

    #[error("model call failed: {0}")]
    UpstreamGeneration(#[from] LlmError),

    #[error("could not parse model response: {0}")]
    ResponseParse(#[from] DraftParseError),

    #[error("A post with slug '{0}' already exists")]
    SlugConflict(String),

    #[error("could not read existing posts: {0}")]
    StorageRead(StoreError),

    #[error("could not save post: {0}")]
    StorageWrite(StoreError),
}

impl From<GenerateError> for AppError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::MissingInput => AppError::Validation(err.to_string()),
            GenerateError::MissingConfiguration => AppError::MissingConfiguration(err.to_string()),
            GenerateError::UpstreamGeneration(e) => AppError::Llm(e.to_string()),
            GenerateError::ResponseParse(e) => AppError::ResponseParse(e.to_string()),
            GenerateError::SlugConflict(_) => AppError::Conflict(err.to_string()),
            GenerateError::StorageRead(_) | GenerateError::StorageWrite(_) => {
                AppError::Storage(err.to_string())
            }
        }
    }
}

/// Runs the generation pipeline for one topic and persists the result.
///
/// Steps:
/// 1. reject empty topic / unconfigured model
/// 2. build prompt
/// 3. single model call
/// 4. parse_draft() (fence strip, one repair attempt)
/// 5. slugify(title)
/// 6. store.exists(slug) → SlugConflict
/// 7. select_image_url(keywords, topic)
/// 8. store.ensure_initialized()
/// 9. store.append_row()
pub async fn generate_post(
    llm: &dyn TextGenerator,
    store: &dyn PostStore,
    catalog: &Catalog,
    request: &GenerateRequest,
) -> Result<BlogPost, GenerateError> {
    // Step 1: Validate
    let topic = request.topic.as_deref().unwrap_or_default().trim();
    if topic.is_empty() {
        return Err(GenerateError::MissingInput);
    }
    if !llm.is_configured() {
        return Err(GenerateError::MissingConfiguration);
    }
    let category = request
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CATEGORY);

    // Steps 2-3: Prompt and model call
    info!("Generating post for topic '{topic}' ({category})");
    let prompt = build_blog_prompt(topic, category);
    let raw = llm.generate(&prompt, &build_system()).await?;

    // Step 4: Parse
    let draft = parse_draft(&raw).map_err(|e| {
        warn!(
            "Unparseable model response for '{topic}': {:?}",
            raw.chars().take(200).collect::<String>()
        );
        e
    })?;

    // Step 5: Slug
    let slug = slugify(&draft.title);
    if slug.is_empty() {
        return Err(DraftParseError::MissingTitle.into());
    }

    // Step 6: Existence check
    if store
        .exists(&slug)
        .await
        .map_err(GenerateError::StorageRead)?
    {
        return Err(GenerateError::SlugConflict(slug));
    }

    // Step 7: Image
    let image_url = select_image_url(draft.image_keywords.as_deref(), topic, &catalog.photo_ids)
        .unwrap_or_default();

    let post = BlogPost {
        slug,
        title: draft.title,
        excerpt: draft.excerpt,
        content: draft.content,
        date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
        reading_time: draft.reading_time,
        tags: draft.tags,
        author: catalog.author.clone(),
        image_url,
    };

    // Steps 8-9: Persist
    store
        .ensure_initialized()
        .await
        .map_err(GenerateError::StorageWrite)?;
    store
        .append_row(&post.to_row())
        .await
        .map_err(GenerateError::StorageWrite)?;

    info!("Generated post '{}' for topic '{topic}'", post.slug);
    Ok(post)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{LlmError, TextGenerator};

    /// `TextGenerator` that replays scripted responses in order.
    pub struct ScriptedGenerator {
        configured: bool,
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
            Self {
                configured: true,
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn unconfigured() -> Self {
            Self {
                configured: false,
                ..Self::new(Vec::new())
            }
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    pub fn model_json(title: &str) -> String {
        serde_json::json!({
            "title": title,
            "excerpt": format!("All about {title}."),
            "content": "## Introduction\n\nBody text.",
            "tags": ["Security", "Web", "Best Practices"],
            "readingTime": 7,
            "suggestedImageKeywords": "code, laptop, security"
        })
        .to_string()
    }

    pub fn upstream_failure() -> LlmError {
        LlmError::Api {
            status: 503,
            message: "The model is overloaded".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{model_json, upstream_failure, ScriptedGenerator};
    use super::*;
    use crate::sheets::memory::MemoryStore;

    fn request(topic: &str) -> GenerateRequest {
        GenerateRequest {
            topic: Some(topic.to_string()),
            category: None,
        }
    }

    #[tokio::test]
    async fn test_generates_and_persists_post() {
        let llm = ScriptedGenerator::new(vec![Ok(model_json("Secure API Design: A Primer"))]);
        let store = MemoryStore::new();
        let catalog = Catalog::default();

        let post = generate_post(&llm, &store, &catalog, &request("Secure API Design Principles"))
            .await
            .unwrap();

        assert_eq!(post.slug, "secure-api-design-a-primer");
        assert_eq!(post.reading_time, 7);
        assert_eq!(post.author, catalog.author);
        assert_eq!(post.date.len(), 10);
        assert!(post.image_url.starts_with("https://images.pexels.com/photos/"));

        let rows = store.list_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(BlogPost::from_row(&rows[0], &catalog.author), post);
        assert_eq!(store.sheet()[0][0], "slug");
    }

    #[tokio::test]
    async fn test_prompt_uses_default_category() {
        let llm = ScriptedGenerator::new(vec![Ok(model_json("Title"))]);
        let store = MemoryStore::new();
        generate_post(&llm, &store, &Catalog::default(), &request("Docker"))
            .await
            .unwrap();
        assert!(llm.prompts()[0].contains("in the programming category"));
    }

    #[tokio::test]
    async fn test_empty_topic_is_rejected_before_model_call() {
        let llm = ScriptedGenerator::new(vec![Ok(model_json("Title"))]);
        let store = MemoryStore::new();
        let err = generate_post(&llm, &store, &Catalog::default(), &request("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingInput));
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_model_appends_nothing() {
        let llm = ScriptedGenerator::unconfigured();
        let store = MemoryStore::new();
        let err = generate_post(&llm, &store, &Catalog::default(), &request("Docker"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingConfiguration));
        assert_eq!(store.append_count(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_reported() {
        let llm = ScriptedGenerator::new(vec![Err(upstream_failure())]);
        let store = MemoryStore::new();
        let err = generate_post(&llm, &store, &Catalog::default(), &request("Docker"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::UpstreamGeneration(_)));
        assert_eq!(store.append_count(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_response_persists_nothing() {
        let llm = ScriptedGenerator::new(vec![Ok("Sorry, I can't do that.".to_string())]);
        let store = MemoryStore::new();
        let err = generate_post(&llm, &store, &Catalog::default(), &request("Docker"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::ResponseParse(_)));
        assert_eq!(store.append_count(), 0);
    }

    #[tokio::test]
    async fn test_symbol_only_title_is_parse_failure() {
        let llm = ScriptedGenerator::new(vec![Ok(model_json("!!!"))]);
        let store = MemoryStore::new();
        let err = generate_post(&llm, &store, &Catalog::default(), &request("Docker"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::ResponseParse(DraftParseError::MissingTitle)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_title_conflicts() {
        let llm = ScriptedGenerator::new(vec![
            Ok(model_json("Docker for Web Developers")),
            Ok(model_json("Docker for Web Developers!")),
        ]);
        let store = MemoryStore::new();
        let catalog = Catalog::default();

        generate_post(&llm, &store, &catalog, &request("Docker"))
            .await
            .unwrap();
        let err = generate_post(&llm, &store, &catalog, &request("Docker again"))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerateError::SlugConflict(ref s) if s == "docker-for-web-developers"));
        let matching = store
            .list_rows()
            .await
            .unwrap()
            .iter()
            .filter(|r| r[0] == "docker-for-web-developers")
            .count();
        assert_eq!(matching, 1);
    }

    #[tokio::test]
    async fn test_append_failure_is_storage_error() {
        let llm = ScriptedGenerator::new(vec![Ok(model_json("Title"))]);
        let store = MemoryStore::new();
        store.fail_appends();
        let err = generate_post(&llm, &store, &Catalog::default(), &request("Docker"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::StorageWrite(_)));
    }

    #[tokio::test]
    async fn test_image_falls_back_to_topic_without_keywords() {
        let llm = ScriptedGenerator::new(vec![Ok(r#"{"title": "No Keywords"}"#.to_string())]);
        let store = MemoryStore::new();
        let catalog = Catalog::default();
        let post = generate_post(&llm, &store, &catalog, &request("Docker"))
            .await
            .unwrap();
        assert_eq!(
            Some(post.image_url),
            select_image_url(None, "Docker", &catalog.photo_ids)
        );
        assert!(post.tags.is_empty());
        assert_eq!(post.reading_time, 8);
    }

    #[test]
    fn test_error_mapping_to_http() {
        use axum::http::StatusCode;
        let status = |e: GenerateError| AppError::from(e).parts().0;
        assert_eq!(status(GenerateError::MissingInput), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(GenerateError::SlugConflict("x".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(GenerateError::MissingConfiguration),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(GenerateError::UpstreamGeneration(LlmError::EmptyContent)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_generate_request_defaults() {
        let request: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(request.topic.is_none());
        assert!(request.category.is_none());
    }

    #[tokio::test]
    async fn test_null_topic_is_missing_input() {
        let llm = ScriptedGenerator::new(vec![Ok(model_json("Unused"))]);
        let store = MemoryStore::new();
        let request: GenerateRequest =
            serde_json::from_str(r#"{"topic": null, "category": "programming"}"#).unwrap();
        assert!(request.topic.is_none());

        let err = generate_post(&llm, &store, &Catalog::default(), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingInput));
        assert!(llm.prompts().is_empty());
    }
}
