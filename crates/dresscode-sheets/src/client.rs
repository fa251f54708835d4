//! Sheets v4 client implementation

use crate::SheetsError;
use dresscode_auth::TokenProvider;
use dresscode_domain::traits::{SpreadsheetGateway, Worksheet};
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default Sheets v4 API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://sheets.googleapis.com/v4";

/// Default timeout for a single request (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    fn first_cell_is_blank(&self) -> bool {
        match self.values.first().and_then(|row| row.first()) {
            None | Some(serde_json::Value::Null) => true,
            Some(serde_json::Value::String(s)) => s.is_empty(),
            Some(_) => false,
        }
    }
}

/// A1 range naming a whole sheet, with the title quoted
pub fn sheet_range(title: &str, cells: Option<&str>) -> String {
    let quoted = format!("'{}'", title.replace('\'', "''"));
    match cells {
        Some(cells) => format!("{}!{}", quoted, cells),
        None => quoted,
    }
}

#[derive(Clone)]
struct Connection {
    endpoint: Url,
    client: reqwest::Client,
    tokens: Arc<TokenProvider>,
}

impl Connection {
    /// `{endpoint}/spreadsheets/{id}/...segments`, each segment percent-encoded
    fn url(&self, spreadsheet_id: &str, segments: &[&str]) -> Result<Url, SheetsError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| SheetsError::Communication(format!("Invalid endpoint: {}", self.endpoint)))?
            .pop_if_empty()
            .push("spreadsheets")
            .push(spreadsheet_id)
            .extend(segments);
        Ok(url)
    }
}

/// Sheets v4 gateway
pub struct SheetsClient {
    connection: Connection,
}

impl SheetsClient {
    /// Create a client against the default endpoint
    pub fn new(tokens: Arc<TokenProvider>) -> Result<Self, SheetsError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, tokens)
    }

    /// Create a client against a specific endpoint
    pub fn with_endpoint(endpoint: &str, tokens: Arc<TokenProvider>) -> Result<Self, SheetsError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SheetsError::Communication(format!("Invalid endpoint {}: {}", endpoint, e)))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| SheetsError::Communication(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            connection: Connection {
                endpoint,
                client,
                tokens,
            },
        })
    }
}

impl SpreadsheetGateway for SheetsClient {
    type Error = SheetsError;
    type Sheet = SheetsWorksheet;

    async fn get_sheet(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<Option<SheetsWorksheet>, SheetsError> {
        let conn = &self.connection;
        let token = conn.tokens.access_token().await?;
        let url = conn.url(spreadsheet_id, &[])?;

        let response = conn
            .client
            .get(url)
            .bearer_auth(token)
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await?;
        let response = check_status(response, spreadsheet_id).await?;
        let metadata: SpreadsheetMetadata = response.json().await?;

        let found = metadata
            .sheets
            .into_iter()
            .any(|sheet| sheet.properties.title == sheet_name);
        debug!("Sheet '{}' in {}: {}", sheet_name, spreadsheet_id, found);

        Ok(found.then(|| SheetsWorksheet {
            connection: conn.clone(),
            spreadsheet_id: spreadsheet_id.to_string(),
            title: sheet_name.to_string(),
        }))
    }
}

/// Handle to one worksheet tab
pub struct SheetsWorksheet {
    connection: Connection,
    spreadsheet_id: String,
    title: String,
}

impl Worksheet for SheetsWorksheet {
    type Error = SheetsError;

    fn title(&self) -> &str {
        &self.title
    }

    async fn is_empty(&self) -> Result<bool, SheetsError> {
        let conn = &self.connection;
        let token = conn.tokens.access_token().await?;
        let range = sheet_range(&self.title, Some("A1"));
        let url = conn.url(&self.spreadsheet_id, &["values", range.as_str()])?;

        let response = conn.client.get(url).bearer_auth(token).send().await?;
        let response = check_status(response, &range).await?;
        let values: ValueRange = response.json().await?;

        Ok(values.first_cell_is_blank())
    }

    async fn append_row(&self, values: &[String]) -> Result<(), SheetsError> {
        let conn = &self.connection;
        let token = conn.tokens.access_token().await?;
        let range = format!("{}:append", sheet_range(&self.title, None));
        let url = conn.url(&self.spreadsheet_id, &["values", range.as_str()])?;

        let body = serde_json::json!({ "values": [values] });
        let response = conn
            .client
            .post(url)
            .bearer_auth(token)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()
            .await?;
        check_status(response, &range).await?;

        Ok(())
    }
}

/// Turn non-success statuses into errors
async fn check_status(
    response: reqwest::Response,
    subject: &str,
) -> Result<reqwest::Response, SheetsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(SheetsError::NotFound(subject.to_string()));
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(SheetsError::Communication(format!("HTTP {}: {}", status, error_text)))
}
