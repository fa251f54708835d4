//! Drive v3 client implementation
//!
//! Every request carries `supportsAllDrives=true`; listings also carry
//! `includeItemsFromAllDrives=true`. Without them the API silently leaves out
//! shared-drive content.

use crate::DriveError;
use dresscode_auth::TokenProvider;
use dresscode_domain::traits::{FileEntry, FileMetadata, FileStore, FolderEntry, FOLDER_MIME_TYPE};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default Drive v3 API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/drive/v3";

/// Default timeout for a single request (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Page size requested for listings
const PAGE_SIZE: &str = "1000";

const FOLDER_FIELDS: &str = "nextPageToken, files(id, name, createdTime, modifiedTime)";
const FILE_FIELDS: &str =
    "nextPageToken, files(id, name, size, mimeType, createdTime, modifiedTime, webViewLink)";
const METADATA_FIELDS: &str =
    "id, name, size, mimeType, parents, createdTime, modifiedTime, webViewLink";

/// One page of a `files.list` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListPage {
    #[serde(default)]
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// A file resource as returned by the API
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    /// Decimal string; absent for folders and native documents
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    created_time: Option<String>,
    #[serde(default)]
    modified_time: Option<String>,
    #[serde(default)]
    web_view_link: Option<String>,
    #[serde(default)]
    parents: Vec<String>,
}

impl DriveFile {
    fn size_bytes(&self) -> u64 {
        self.size
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    fn into_entry(self) -> FileEntry {
        let size_bytes = self.size_bytes();
        FileEntry {
            id: self.id,
            name: self.name,
            size_bytes,
            mime_type: self.mime_type.unwrap_or_default(),
            created_at: self.created_time.unwrap_or_default(),
            modified_at: self.modified_time.unwrap_or_default(),
            web_link: self.web_view_link.unwrap_or_default(),
        }
    }

    fn into_metadata(mut self) -> FileMetadata {
        let parent_ids = std::mem::take(&mut self.parents);
        FileMetadata {
            entry: self.into_entry(),
            parent_ids,
        }
    }
}

/// Build the `q` expression for a folder listing
pub fn subfolder_query(parent_id: &str) -> String {
    format!(
        "'{}' in parents and mimeType='{}' and trashed=false",
        escape_query_value(parent_id),
        FOLDER_MIME_TYPE
    )
}

/// Build the `q` expression for a file listing
pub fn file_query(parent_id: &str, mime_type: Option<&str>) -> String {
    let mut query = format!("'{}' in parents and trashed=false", escape_query_value(parent_id));
    if let Some(mime_type) = mime_type {
        query.push_str(&format!(" and mimeType='{}'", escape_query_value(mime_type)));
    }
    query
}

fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Drive v3 gateway
pub struct DriveClient {
    endpoint: String,
    client: reqwest::Client,
    tokens: Arc<TokenProvider>,
}

impl DriveClient {
    /// Create a client against the default endpoint
    pub fn new(tokens: Arc<TokenProvider>) -> Result<Self, DriveError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, tokens)
    }

    /// Create a client against a specific endpoint
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        tokens: Arc<TokenProvider>,
    ) -> Result<Self, DriveError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| DriveError::Communication(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
            tokens,
        })
    }

    /// List every page of a `files.list` query
    async fn list_all(&self, query: &str, fields: &str) -> Result<Vec<DriveFile>, DriveError> {
        let url = format!("{}/files", self.endpoint);
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let token = self.tokens.access_token().await?;
            let mut params: Vec<(&str, &str)> = vec![
                ("q", query),
                ("fields", fields),
                ("orderBy", "name"),
                ("pageSize", PAGE_SIZE),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ];
            if let Some(page_token) = page_token.as_deref() {
                params.push(("pageToken", page_token));
            }

            let response = self
                .client
                .get(&url)
                .bearer_auth(token)
                .query(&params)
                .send()
                .await?;
            let response = check_status(response, query).await?;
            let page: FileListPage = response.json().await?;

            files.extend(page.files);
            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        Ok(files)
    }
}

/// Turn non-success statuses into errors
async fn check_status(
    response: reqwest::Response,
    subject: &str,
) -> Result<reqwest::Response, DriveError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(DriveError::NotFound(subject.to_string()));
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(DriveError::Communication(format!("HTTP {}: {}", status, error_text)))
}

impl FileStore for DriveClient {
    type Error = DriveError;

    async fn list_subfolders(&self, parent_id: &str) -> Result<Vec<FolderEntry>, DriveError> {
        let files = self.list_all(&subfolder_query(parent_id), FOLDER_FIELDS).await?;
        debug!("Listed {} subfolders of {}", files.len(), parent_id);

        Ok(files
            .into_iter()
            .map(|f| FolderEntry { id: f.id, name: f.name })
            .collect())
    }

    async fn list_files(
        &self,
        parent_id: &str,
        mime_type: Option<&str>,
    ) -> Result<Vec<FileEntry>, DriveError> {
        let files = self
            .list_all(&file_query(parent_id, mime_type), FILE_FIELDS)
            .await?;
        debug!("Listed {} files in {}", files.len(), parent_id);

        Ok(files.into_iter().map(DriveFile::into_entry).collect())
    }

    async fn get_metadata(&self, id: &str) -> Result<FileMetadata, DriveError> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/files/{}", self.endpoint, id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("fields", METADATA_FIELDS), ("supportsAllDrives", "true")])
            .send()
            .await?;
        let response = check_status(response, id).await?;
        let file: DriveFile = response.json().await?;

        Ok(file.into_metadata())
    }

    async fn download(&self, id: &str) -> Result<Vec<u8>, DriveError> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/files/{}", self.endpoint, id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("alt", "media"), ("supportsAllDrives", "true")])
            .send()
            .await?;
        let response = check_status(response, id).await?;
        let bytes = response.bytes().await?;

        debug!("Downloaded {} bytes for {}", bytes.len(), id);
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subfolder_query() {
        assert_eq!(
            subfolder_query("root123"),
            "'root123' in parents and mimeType='application/vnd.google-apps.folder' and trashed=false"
        );
    }

    #[test]
    fn test_file_query_with_mime_type() {
        assert_eq!(
            file_query("school1", Some("application/pdf")),
            "'school1' in parents and trashed=false and mimeType='application/pdf'"
        );
        assert_eq!(file_query("school1", None), "'school1' in parents and trashed=false");
    }

    #[test]
    fn test_query_escapes_quotes() {
        assert_eq!(
            file_query("it's", None),
            "'it\\'s' in parents and trashed=false"
        );
    }

    #[test]
    fn test_parse_list_page() {
        let json = r#"{
            "nextPageToken": "p2",
            "files": [
                {
                    "id": "abc",
                    "name": "校則.pdf",
                    "size": "2097152",
                    "mimeType": "application/pdf",
                    "createdTime": "2025-01-01T00:00:00.000Z",
                    "modifiedTime": "2025-02-01T00:00:00.000Z",
                    "webViewLink": "https://drive.google.com/file/d/abc/view"
                },
                { "id": "def", "name": "folder" }
            ]
        }"#;

        let page: FileListPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("p2"));
        assert_eq!(page.files.len(), 2);

        let mut files = page.files.into_iter();
        let pdf = files.next().unwrap().into_entry();
        assert_eq!(pdf.size_bytes, 2_097_152);
        assert_eq!(pdf.mime_type, "application/pdf");
        assert_eq!(pdf.web_link, "https://drive.google.com/file/d/abc/view");

        let folder = files.next().unwrap().into_entry();
        assert_eq!(folder.size_bytes, 0);
        assert_eq!(folder.web_link, "");
    }

    #[test]
    fn test_parse_metadata_with_parents() {
        let json = r#"{ "id": "ward1", "name": "渋谷区", "parents": ["year2025"] }"#;
        let file: DriveFile = serde_json::from_str(json).unwrap();
        let metadata = file.into_metadata();
        assert_eq!(metadata.entry.name, "渋谷区");
        assert_eq!(metadata.parent_ids, vec!["year2025".to_string()]);
    }

    #[test]
    fn test_unparsable_size_is_zero() {
        let file = DriveFile {
            size: Some("n/a".to_string()),
            ..Default::default()
        };
        assert_eq!(file.size_bytes(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let tokens = Arc::new(TokenProvider::with_static_token("test"));
        let client = DriveClient::with_endpoint("http://127.0.0.1:1", tokens).unwrap();

        let result = client.list_subfolders("root").await;
        assert!(matches!(result, Err(DriveError::Communication(_))));
    }
}
