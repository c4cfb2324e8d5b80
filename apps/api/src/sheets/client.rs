//! Thin Google Sheets v4 REST client: value ranges and sheet metadata.

use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use super::auth::TokenProvider;
use super::StoreError;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Serialize)]
struct ValueRangeBody<'a> {
    values: &'a [Vec<String>],
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

pub struct SheetsClient {
    client: Client,
    auth: Box<dyn TokenProvider>,
    base_url: String,
    spreadsheet_id: String,
}

impl SheetsClient {
    pub fn new(
        client: Client,
        auth: impl TokenProvider + 'static,
        spreadsheet_id: String,
    ) -> Self {
        Self {
            client,
            auth: Box::new(auth),
            base_url: SHEETS_API_BASE.to_string(),
            spreadsheet_id,
        }
    }

    /// Points the client at another Sheets-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reads a range. Trailing empty cells and rows are omitted by the API.
    pub async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let url = values_url(&self.base_url, &self.spreadsheet_id, range, None)?;
        let body: ValueRange = self.send(self.client.get(url)).await?;
        Ok(body
            .values
            .into_iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }

    pub async fn append_values(&self, range: &str, rows: &[Vec<String>]) -> Result<(), StoreError> {
        let url = values_url(&self.base_url, &self.spreadsheet_id, range, Some("append"))?;
        let request = self
            .client
            .post(url)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&ValueRangeBody { values: rows });
        self.send::<Value>(request).await?;
        Ok(())
    }

    pub async fn update_values(&self, range: &str, rows: &[Vec<String>]) -> Result<(), StoreError> {
        let url = values_url(&self.base_url, &self.spreadsheet_id, range, None)?;
        let request = self
            .client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&ValueRangeBody { values: rows });
        self.send::<Value>(request).await?;
        Ok(())
    }

    pub async fn clear_values(&self, range: &str) -> Result<(), StoreError> {
        let url = values_url(&self.base_url, &self.spreadsheet_id, range, Some("clear"))?;
        self.send::<Value>(self.client.post(url).json(&json!({})))
            .await?;
        Ok(())
    }

    pub async fn sheet_titles(&self) -> Result<Vec<String>, StoreError> {
        let url = spreadsheet_url(&self.base_url, &self.spreadsheet_id, None)?;
        let request = self
            .client
            .get(url)
            .query(&[("fields", "sheets.properties.title")]);
        let meta: SpreadsheetMeta = self.send(request).await?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    pub async fn add_sheet(&self, title: &str) -> Result<(), StoreError> {
        let url = spreadsheet_url(&self.base_url, &self.spreadsheet_id, Some("batchUpdate"))?;
        let body = json!({
            "requests": [
                { "addSheet": { "properties": { "title": title } } }
            ]
        });
        self.send::<Value>(self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let token = self.auth.access_token().await?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

/// `{base}/{id}` or `{base}/{id}:{method}`.
fn spreadsheet_url(base: &str, spreadsheet_id: &str, method: Option<&str>) -> Result<Url, StoreError> {
    let segment = match method {
        Some(method) => format!("{spreadsheet_id}:{method}"),
        None => spreadsheet_id.to_string(),
    };
    build_url(base, &[&segment])
}

/// `{base}/{id}/values/{range}` or `{base}/{id}/values/{range}:{method}`.
fn values_url(
    base: &str,
    spreadsheet_id: &str,
    range: &str,
    method: Option<&str>,
) -> Result<Url, StoreError> {
    let range_segment = match method {
        Some(method) => format!("{range}:{method}"),
        None => range.to_string(),
    };
    build_url(base, &[spreadsheet_id, "values", &range_segment])
}

fn build_url(base: &str, segments: &[&str]) -> Result<Url, StoreError> {
    let mut url = Url::parse(base).map_err(|e| StoreError::Url(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| StoreError::Url(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
