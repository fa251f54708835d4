//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and the three
//! external services. Implementations live in the gateway crates, each of
//! which also ships an in-memory fake for tests.

use std::time::Duration;

/// MIME type reported by the file store for folders
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// MIME type of eligible documents
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A folder entry returned by a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    /// Folder identifier
    pub id: String,

    /// Folder display name
    pub name: String,
}

/// A file entry returned by a listing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileEntry {
    /// File identifier
    pub id: String,

    /// File display name
    pub name: String,

    /// Size in bytes (0 when the store does not report one)
    pub size_bytes: u64,

    /// MIME type
    pub mime_type: String,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,

    /// Modification timestamp (RFC 3339)
    pub modified_at: String,

    /// Web view link
    pub web_link: String,
}

/// Metadata of a single item, including its parents
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileMetadata {
    /// The item itself
    pub entry: FileEntry,

    /// Parent folder identifiers
    pub parent_ids: Vec<String>,
}

/// Trait for the hierarchical file store
///
/// Implemented by the infrastructure layer (dresscode-drive). Every call is
/// made with shared-drive addressing enabled.
pub trait FileStore {
    /// Error type for store operations
    type Error;

    /// List the immediate subfolders of a folder, in store order
    async fn list_subfolders(&self, parent_id: &str) -> Result<Vec<FolderEntry>, Self::Error>;

    /// List the files of a folder, optionally restricted to one MIME type
    async fn list_files(
        &self,
        parent_id: &str,
        mime_type: Option<&str>,
    ) -> Result<Vec<FileEntry>, Self::Error>;

    /// Fetch metadata for a single item
    async fn get_metadata(&self, id: &str) -> Result<FileMetadata, Self::Error>;

    /// Download the raw bytes of a file
    async fn download(&self, id: &str) -> Result<Vec<u8>, Self::Error>;
}

/// Trait for the document analysis service
///
/// Implemented by the infrastructure layer (dresscode-llm)
pub trait DocumentAnalyzer {
    /// Error type for analysis operations
    type Error;

    /// Analyze a document and return the raw response text
    async fn analyze(&self, document: &[u8], display_name: &str) -> Result<String, Self::Error>;

    /// Check that the credentials and model are usable
    async fn test_connection(&self) -> Result<(), Self::Error>;

    /// Name of the model producing the analysis
    fn model_name(&self) -> &str;
}

/// Trait for a single worksheet handle
///
/// Implemented by the infrastructure layer (dresscode-sheets)
pub trait Worksheet {
    /// Error type for worksheet operations
    type Error;

    /// Worksheet title
    fn title(&self) -> &str;

    /// True when the sheet holds no data yet (header not written)
    async fn is_empty(&self) -> Result<bool, Self::Error>;

    /// Append one row after the last row with data
    async fn append_row(&self, values: &[String]) -> Result<(), Self::Error>;
}

/// Trait for opening worksheets inside a spreadsheet
pub trait SpreadsheetGateway {
    /// Error type for spreadsheet operations
    type Error;

    /// Worksheet handle type
    type Sheet: Worksheet;

    /// Open a worksheet by title; `None` when the tab does not exist
    async fn get_sheet(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<Option<Self::Sheet>, Self::Error>;
}

/// Trait for the fixed delay between documents
///
/// Injected so tests can run without real delays.
pub trait Pacer {
    /// Wait for the given duration
    async fn pause(&self, delay: Duration);
}
