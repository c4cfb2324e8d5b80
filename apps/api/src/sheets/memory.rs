//! In-process `PostStore` used by handler and pipeline tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{data_rows, PostStore, StoreError};
use crate::models::post::{PostRow, HEADER};

#[derive(Default)]
pub struct MemoryStore {
    /// Whole sheet, header included once initialized.
    sheet: Mutex<Vec<Vec<String>>>,
    fail_reads: AtomicBool,
    fail_appends: AtomicBool,
    appends: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose sheet already holds a header and `rows`.
    pub fn with_rows(rows: Vec<PostRow>) -> Self {
        let store = Self::new();
        {
            let mut sheet = store.sheet.lock().unwrap();
            sheet.push(header_row());
            sheet.extend(rows.into_iter().map(|r| r.to_vec()));
        }
        store
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_appends(&self) {
        self.fail_appends.store(true, Ordering::SeqCst);
    }

    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    pub fn sheet(&self) -> Vec<Vec<String>> {
        self.sheet.lock().unwrap().clone()
    }
}

fn header_row() -> Vec<String> {
    HEADER.iter().map(|h| h.to_string()).collect()
}

fn unavailable() -> StoreError {
    StoreError::Api {
        status: 503,
        message: "backend unavailable".to_string(),
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list_rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(data_rows(self.sheet()))
    }

    async fn append_row(&self, row: &PostRow) -> Result<(), StoreError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.sheet.lock().unwrap().push(row.to_vec());
        self.appends.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn ensure_initialized(&self) -> Result<(), StoreError> {
        let mut sheet = self.sheet.lock().unwrap();
        if sheet.is_empty() {
            sheet.push(header_row());
        }
        Ok(())
    }

    async fn clear_rows(&self) -> Result<usize, StoreError> {
        let mut sheet = self.sheet.lock().unwrap();
        let count = sheet.len().saturating_sub(1);
        sheet.truncate(1);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_initialized_is_idempotent() {
        let store = MemoryStore::new();
        store.ensure_initialized().await.unwrap();
        store.ensure_initialized().await.unwrap();
        assert_eq!(store.sheet().len(), 1);
        assert_eq!(store.sheet()[0][0], "slug");
    }

    #[tokio::test]
    async fn test_clear_rows_keeps_header() {
        let mut row: PostRow = Default::default();
        row[0] = "a".to_string();
        let store = MemoryStore::with_rows(vec![row.clone(), row]);
        assert_eq!(store.clear_rows().await.unwrap(), 2);
        assert_eq!(store.sheet(), vec![header_row()]);
        assert!(store.list_rows().await.unwrap().is_empty());
        assert_eq!(store.clear_rows().await.unwrap(), 0);
    }
}
