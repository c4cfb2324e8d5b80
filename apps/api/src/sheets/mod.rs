//! Spreadsheet-backed post store.
//!
//! `PostStore` is the seam the generator and read handlers depend on;
//! `SheetsPostStore` implements it over the Google Sheets v4 REST API.
//! No retries or backoff anywhere in this module: any remote failure
//! surfaces as a `StoreError`.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::post::PostRow;

pub mod auth;
pub mod client;
#[cfg(test)]
pub mod memory;
pub mod store;

pub use store::SheetsPostStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Token signing failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid request URL: {0}")]
    Url(String),
}

impl StoreError {
    /// Sheets answers a read of a range on a missing tab with 400 "Unable to parse range".
    pub fn is_missing_range(&self) -> bool {
        matches!(
            self,
            StoreError::Api { status: 400, message } if message.contains("Unable to parse range")
        )
    }
}

/// Append-only post table. Rows are `PostRow`s; the header row is never
/// returned by `list_rows`.
///
/// Carried in `AppState` as `Arc<dyn PostStore>`.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All data rows in sheet order. Empty when the sheet holds at most a
    /// header or does not exist yet.
    async fn list_rows(&self) -> Result<Vec<Vec<String>>, StoreError>;

    /// Appends one row after the last used row.
    async fn append_row(&self, row: &PostRow) -> Result<(), StoreError>;

    /// Creates the sheet and header row if missing. Safe to call repeatedly.
    async fn ensure_initialized(&self) -> Result<(), StoreError>;

    /// Removes every data row, keeping the header. Returns how many rows were removed.
    async fn clear_rows(&self) -> Result<usize, StoreError>;

    /// Linear scan of the slug column. Not atomic with a following append.
    async fn exists(&self, slug: &str) -> Result<bool, StoreError> {
        let rows = self.list_rows().await?;
        Ok(rows
            .iter()
            .any(|row| row.first().map(String::as_str) == Some(slug)))
    }
}

/// Drops the header from a full-sheet read.
pub(crate) fn data_rows(mut values: Vec<Vec<String>>) -> Vec<Vec<String>> {
    if values.len() <= 1 {
        return Vec::new();
    }
    values.remove(0);
    values
}
