use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::auth::ServiceAccountAuth;
use super::client::SheetsClient;
use super::{data_rows, PostStore, StoreError};
use crate::config::SheetsConfig;
use crate::models::post::{PostRow, HEADER};

/// Sheet holding one post per row, header in row 1.
pub const POSTS_SHEET: &str = "Posts";

/// `PostStore` over a single Google Sheets tab, columns A–J.
pub struct SheetsPostStore {
    client: SheetsClient,
    sheet: String,
}

impl SheetsPostStore {
    pub fn new(config: &SheetsConfig) -> Result<Self, StoreError> {
        let http = Client::new();
        let auth = ServiceAccountAuth::new(
            http.clone(),
            config.client_email.clone(),
            &config.private_key,
        )?;
        Ok(Self::with_client(SheetsClient::new(
            http,
            auth,
            config.spreadsheet_id.clone(),
        )))
    }

    pub fn with_client(client: SheetsClient) -> Self {
        Self {
            client,
            sheet: POSTS_SHEET.to_string(),
        }
    }

    fn full_range(&self) -> String {
        format!("{}!A:J", self.sheet)
    }

    fn header_range(&self) -> String {
        format!("{}!A1:J1", self.sheet)
    }

    fn data_range(&self) -> String {
        format!("{}!A2:J", self.sheet)
    }
}

#[async_trait]
impl PostStore for SheetsPostStore {
    async fn list_rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        match self.client.get_values(&self.full_range()).await {
            Ok(values) => Ok(data_rows(values)),
            // Tab not created yet: nothing has been published.
            Err(e) if e.is_missing_range() => {
                debug!("Sheet '{}' does not exist yet; no posts", self.sheet);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn append_row(&self, row: &PostRow) -> Result<(), StoreError> {
        self.client
            .append_values(&self.full_range(), &[row.to_vec()])
            .await?;
        info!("Appended post row '{}' to sheet {}", row[0], self.sheet);
        Ok(())
    }

    async fn ensure_initialized(&self) -> Result<(), StoreError> {
        let titles = self.client.sheet_titles().await?;
        if !titles.iter().any(|t| t == &self.sheet) {
            self.client.add_sheet(&self.sheet).await?;
            info!("Created sheet '{}'", self.sheet);
        }

        let header = self.client.get_values(&self.header_range()).await?;
        if header.is_empty() {
            let header_row: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
            self.client
                .update_values(&self.header_range(), &[header_row])
                .await?;
            info!("Wrote header row to sheet '{}'", self.sheet);
        }

        Ok(())
    }

    async fn clear_rows(&self) -> Result<usize, StoreError> {
        let count = self.list_rows().await?.len();
        if count == 0 {
            return Ok(0);
        }
        self.client.clear_values(&self.data_range()).await?;
        info!("Cleared {count} post rows from sheet '{}'", self.sheet);
        Ok(count)
    }
}
