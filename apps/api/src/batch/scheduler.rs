//! Batch scheduler: sequential multi-topic generation.
//!
//! Topics are drawn uniformly without replacement from the union of the
//! catalog's pools. Each topic runs through the same pipeline as
//! `POST /api/generate-blog`, one at a time, with a fixed pause between
//! calls. A failed topic is recorded and the batch moves on; it is never
//! retried.

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{Catalog, Category, Topic};
use crate::generation::generator::GenerateRequest;
use crate::generation::handlers::{run_generation, GenerateBlogResponse};
use crate::state::AppState;

/// Outcome of one topic within a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemResult {
    pub topic: String,
    pub category: Category,
    pub success: bool,
    pub data: Option<GenerateBlogResponse>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub success: bool,
    pub message: String,
    pub results: Vec<BatchItemResult>,
}

impl BatchReport {
    pub fn successes(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }
}

/// Draws up to `count` distinct topics. The catalog's pools are not modified.
pub fn select_topics<R: Rng + ?Sized>(catalog: &Catalog, count: usize, rng: &mut R) -> Vec<Topic> {
    let mut available = catalog.all_topics();
    let mut selected = Vec::with_capacity(count.min(available.len()));

    while selected.len() < count && !available.is_empty() {
        let index = rng.gen_range(0..available.len());
        selected.push(available.remove(index));
    }

    selected
}

/// Generates each topic in order, sleeping `catalog.batch_delay` between calls.
pub async fn run_batch(state: &AppState, topics: Vec<Topic>) -> BatchReport {
    let total = topics.len();
    let mut results = Vec::with_capacity(total);

    for (i, topic) in topics.into_iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(state.catalog.batch_delay).await;
        }

        info!("Batch {}/{}: '{}'", i + 1, total, topic.title);
        let request = GenerateRequest {
            topic: Some(topic.title.clone()),
            category: Some(topic.category.as_str().to_string()),
        };

        let result = match run_generation(state, &request).await {
            Ok(response) => BatchItemResult {
                topic: topic.title,
                category: topic.category,
                success: true,
                data: Some(response),
                error: None,
            },
            Err(e) => {
                warn!("Batch topic '{}' failed: {e}", topic.title);
                BatchItemResult {
                    topic: topic.title,
                    category: topic.category,
                    success: false,
                    data: None,
                    error: Some(e.summary()),
                }
            }
        };
        results.push(result);
    }

    let mut report = BatchReport {
        success: true,
        message: String::new(),
        results,
    };
    report.message = format!("Generated {} out of {} blog posts", report.successes(), total);
    info!("{}", report.message);
    report
}
