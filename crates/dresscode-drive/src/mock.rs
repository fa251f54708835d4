//! In-memory file store for deterministic testing

use crate::DriveError;
use dresscode_domain::traits::{
    FileEntry, FileMetadata, FileStore, FolderEntry, FOLDER_MIME_TYPE, PDF_MIME_TYPE,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct MockItem {
    entry: FileEntry,
    parent: Option<String>,
    content: Vec<u8>,
}

/// Mock file store holding a folder tree in memory
///
/// Children are returned in insertion order. Individual operations can be
/// made to fail per item, and every call is recorded.
#[derive(Debug, Clone, Default)]
pub struct MockFileStore {
    items: HashMap<String, MockItem>,
    children: HashMap<String, Vec<String>>,
    failing_listings: HashSet<String>,
    failing_metadata: HashSet<String>,
    failing_downloads: HashSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockFileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level folder with no parent
    pub fn add_root(&mut self, id: &str, name: &str) {
        self.insert(None, id, name, FOLDER_MIME_TYPE, Vec::new());
    }

    /// Add a folder under `parent_id`
    pub fn add_folder(&mut self, parent_id: &str, id: &str, name: &str) {
        self.insert(Some(parent_id), id, name, FOLDER_MIME_TYPE, Vec::new());
    }

    /// Add a PDF file under `parent_id`
    pub fn add_pdf(&mut self, parent_id: &str, id: &str, name: &str, content: &[u8]) {
        self.insert(Some(parent_id), id, name, PDF_MIME_TYPE, content.to_vec());
    }

    /// Add a file of any MIME type under `parent_id`
    pub fn add_file(&mut self, parent_id: &str, id: &str, name: &str, mime_type: &str, content: &[u8]) {
        self.insert(Some(parent_id), id, name, mime_type, content.to_vec());
    }

    /// Make listings of `folder_id` fail
    pub fn fail_listing(&mut self, folder_id: &str) {
        self.failing_listings.insert(folder_id.to_string());
    }

    /// Make metadata lookups of `id` fail
    pub fn fail_metadata(&mut self, id: &str) {
        self.failing_metadata.insert(id.to_string());
    }

    /// Make downloads of `file_id` fail
    pub fn fail_download(&mut self, file_id: &str) {
        self.failing_downloads.insert(file_id.to_string());
    }

    /// Calls made so far, as `operation:id`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn insert(&mut self, parent: Option<&str>, id: &str, name: &str, mime_type: &str, content: Vec<u8>) {
        let entry = FileEntry {
            id: id.to_string(),
            name: name.to_string(),
            size_bytes: content.len() as u64,
            mime_type: mime_type.to_string(),
            created_at: "2025-04-01T00:00:00.000Z".to_string(),
            modified_at: "2025-04-01T00:00:00.000Z".to_string(),
            web_link: format!("https://drive.google.com/file/d/{}/view", id),
        };

        if let Some(parent) = parent {
            self.children
                .entry(parent.to_string())
                .or_default()
                .push(id.to_string());
        }

        self.items.insert(
            id.to_string(),
            MockItem {
                entry,
                parent: parent.map(str::to_string),
                content,
            },
        );
    }

    fn record(&self, operation: &str, id: &str) {
        self.calls.lock().unwrap().push(format!("{}:{}", operation, id));
    }

    fn children_of(&self, parent_id: &str) -> Result<Vec<&MockItem>, DriveError> {
        if self.failing_listings.contains(parent_id) {
            return Err(DriveError::Communication(format!(
                "Injected listing failure for {}",
                parent_id
            )));
        }

        Ok(self
            .children
            .get(parent_id)
            .map(|ids| ids.iter().filter_map(|id| self.items.get(id)).collect())
            .unwrap_or_default())
    }
}

impl FileStore for MockFileStore {
    type Error = DriveError;

    async fn list_subfolders(&self, parent_id: &str) -> Result<Vec<FolderEntry>, DriveError> {
        self.record("list_subfolders", parent_id);

        Ok(self
            .children_of(parent_id)?
            .into_iter()
            .filter(|item| item.entry.mime_type == FOLDER_MIME_TYPE)
            .map(|item| FolderEntry {
                id: item.entry.id.clone(),
                name: item.entry.name.clone(),
            })
            .collect())
    }

    async fn list_files(
        &self,
        parent_id: &str,
        mime_type: Option<&str>,
    ) -> Result<Vec<FileEntry>, DriveError> {
        self.record("list_files", parent_id);

        Ok(self
            .children_of(parent_id)?
            .into_iter()
            .filter(|item| mime_type.is_none_or(|m| item.entry.mime_type == m))
            .map(|item| item.entry.clone())
            .collect())
    }

    async fn get_metadata(&self, id: &str) -> Result<FileMetadata, DriveError> {
        self.record("get_metadata", id);

        if self.failing_metadata.contains(id) {
            return Err(DriveError::Communication(format!(
                "Injected metadata failure for {}",
                id
            )));
        }

        let item = self
            .items
            .get(id)
            .ok_or_else(|| DriveError::NotFound(id.to_string()))?;

        Ok(FileMetadata {
            entry: item.entry.clone(),
            parent_ids: item.parent.iter().cloned().collect(),
        })
    }

    async fn download(&self, id: &str) -> Result<Vec<u8>, DriveError> {
        self.record("download", id);

        if self.failing_downloads.contains(id) {
            return Err(DriveError::Communication(format!(
                "Injected download failure for {}",
                id
            )));
        }

        self.items
            .get(id)
            .map(|item| item.content.clone())
            .ok_or_else(|| DriveError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> MockFileStore {
        let mut store = MockFileStore::new();
        store.add_root("root", "2025_校則データ");
        store.add_folder("root", "ward1", "渋谷区");
        store.add_folder("ward1", "school1", "XX中学校");
        store.add_pdf("school1", "f1", "校則.pdf", b"%PDF-1.4 one");
        store.add_file("school1", "f2", "notes.txt", "text/plain", b"hello");
        store
    }

    #[tokio::test]
    async fn test_list_subfolders_excludes_files() {
        let store = sample_store();
        let folders = store.list_subfolders("school1").await.unwrap();
        assert!(folders.is_empty());

        let folders = store.list_subfolders("ward1").await.unwrap();
        assert_eq!(folders, vec![FolderEntry { id: "school1".into(), name: "XX中学校".into() }]);
    }

    #[tokio::test]
    async fn test_list_files_filters_mime_type() {
        let store = sample_store();
        let all = store.list_files("school1", None).await.unwrap();
        assert_eq!(all.len(), 2);

        let pdfs = store.list_files("school1", Some(PDF_MIME_TYPE)).await.unwrap();
        assert_eq!(pdfs.len(), 1);
        assert_eq!(pdfs[0].name, "校則.pdf");
        assert_eq!(pdfs[0].size_bytes, 12);
    }

    #[tokio::test]
    async fn test_metadata_reports_parent() {
        let store = sample_store();
        let metadata = store.get_metadata("ward1").await.unwrap();
        assert_eq!(metadata.entry.name, "渋谷区");
        assert_eq!(metadata.parent_ids, vec!["root".to_string()]);

        let root = store.get_metadata("root").await.unwrap();
        assert!(root.parent_ids.is_empty());
    }

    #[tokio::test]
    async fn test_download_and_missing_item() {
        let store = sample_store();
        assert_eq!(store.download("f1").await.unwrap(), b"%PDF-1.4 one".to_vec());
        assert!(matches!(store.download("nope").await, Err(DriveError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let mut store = sample_store();
        store.fail_listing("ward1");
        store.fail_download("f1");
        store.fail_metadata("root");

        assert!(store.list_subfolders("ward1").await.is_err());
        assert!(store.download("f1").await.is_err());
        assert!(store.get_metadata("root").await.is_err());
    }

    #[tokio::test]
    async fn test_calls_are_recorded() {
        let store = sample_store();
        store.list_subfolders("root").await.unwrap();
        store.download("f1").await.unwrap();

        assert_eq!(store.calls(), vec!["list_subfolders:root", "download:f1"]);
    }
}
