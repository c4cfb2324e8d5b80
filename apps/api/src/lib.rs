//! Blog content-generation API: Gemini-written posts persisted to a Google Sheet.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod generation;
pub mod llm_client;
pub mod models;
pub mod posts;
pub mod routes;
pub mod sheets;
pub mod state;
