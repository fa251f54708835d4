//! Folder traversal

use crate::config::{CollectionMode, CollectionTarget};
use crate::filter::{filter_candidates, MatchKind};
use crate::region::{extract_year, is_recognized_region, UNKNOWN_YEAR};
use dresscode_domain::traits::{FileStore, FolderEntry, PDF_MIME_TYPE};
use dresscode_domain::DocumentRecord;
use std::fmt;
use tracing::{debug, info, warn};

/// Level of the tree a skipped node sits at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipScope {
    /// The configured root folder
    Root,

    /// A region folder
    Region,

    /// An organization folder
    Organization,
}

impl fmt::Display for SkipScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipScope::Root => "root",
            SkipScope::Region => "region",
            SkipScope::Organization => "organization",
        })
    }
}

/// A subtree that could not be collected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNode {
    /// Tree level
    pub scope: SkipScope,

    /// Folder name, or identifier when the name is unknown
    pub name: String,

    /// Error text
    pub reason: String,
}

/// An accepted document with the rule that accepted it
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedDocument {
    /// The document
    pub record: DocumentRecord,

    /// Keyword or fallback match
    pub match_kind: MatchKind,
}

/// Result of one collection pass
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    /// Accepted documents in traversal order
    pub documents: Vec<CollectedDocument>,

    /// Year token, or the unknown sentinel
    pub year: String,

    /// Mode the collection ran in
    pub mode: CollectionMode,

    /// Subtrees that failed and were skipped
    pub skipped: Vec<SkippedNode>,
}

impl Collection {
    fn empty(mode: CollectionMode) -> Self {
        Self {
            documents: Vec::new(),
            year: UNKNOWN_YEAR.to_string(),
            mode,
            skipped: Vec::new(),
        }
    }

    /// Number of accepted documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when nothing was accepted
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Borrow the records in traversal order
    pub fn records(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.documents.iter().map(|d| &d.record)
    }

    /// Take the records in traversal order
    pub fn into_records(self) -> Vec<DocumentRecord> {
        self.documents.into_iter().map(|d| d.record).collect()
    }
}

/// Walks region → organization → document folders in a file store
///
/// # Examples
///
/// ```
/// use dresscode_collector::{CollectionMode, CollectionTarget, FolderCollector};
/// use dresscode_drive::MockFileStore;
///
/// # async fn example() {
/// let mut store = MockFileStore::new();
/// store.add_root("ward1", "渋谷区");
/// store.add_folder("ward1", "school1", "XX中学校");
/// store.add_pdf("school1", "f1", "校則.pdf", b"%PDF");
///
/// let target = CollectionTarget::new(CollectionMode::Scoped, Some("ward1".into())).unwrap();
/// let collection = FolderCollector::new(&store).collect(&target).await;
/// assert_eq!(collection.len(), 1);
/// # }
/// ```
pub struct FolderCollector<'a, S> {
    store: &'a S,
}

impl<'a, S> FolderCollector<'a, S>
where
    S: FileStore,
    S::Error: fmt::Display,
{
    /// Create a collector over a store
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Collect every accepted document under the target
    ///
    /// Never fails: unreadable subtrees are logged and listed in
    /// `Collection::skipped`.
    pub async fn collect(&self, target: &CollectionTarget) -> Collection {
        info!("Collecting documents ({} mode) from {}", target.mode(), target.root_id());

        let collection = match target.mode() {
            CollectionMode::Batch => self.collect_batch(target.root_id()).await,
            CollectionMode::Scoped => self.collect_scoped(target.root_id()).await,
        };

        info!(
            "Collected {} documents (year: {}, skipped nodes: {})",
            collection.len(),
            collection.year,
            collection.skipped.len()
        );
        collection
    }

    async fn collect_batch(&self, root_id: &str) -> Collection {
        let mut collection = Collection::empty(CollectionMode::Batch);

        match self.store.get_metadata(root_id).await {
            Ok(metadata) => collection.year = extract_year(&metadata.entry.name),
            Err(e) => warn!("Could not read root folder name for {}: {}", root_id, e),
        }

        let region_folders = match self.store.list_subfolders(root_id).await {
            Ok(folders) => folders,
            Err(e) => {
                skip(&mut collection.skipped, SkipScope::Root, root_id, &e);
                return collection;
            }
        };

        let (regions, ignored): (Vec<FolderEntry>, Vec<FolderEntry>) = region_folders
            .into_iter()
            .partition(|folder| is_recognized_region(&folder.name));
        for folder in &ignored {
            debug!("Ignoring unrecognized region folder '{}'", folder.name);
        }
        info!("Processing {} region folders", regions.len());

        for region in regions {
            match self
                .collect_region(&region.id, &region.name, &mut collection.skipped)
                .await
            {
                Ok(documents) => {
                    info!("{}: {} documents", region.name, documents.len());
                    collection.documents.extend(documents);
                }
                Err(e) => skip(&mut collection.skipped, SkipScope::Region, &region.name, &e),
            }
        }

        collection
    }

    async fn collect_scoped(&self, region_id: &str) -> Collection {
        let mut collection = Collection::empty(CollectionMode::Scoped);

        let metadata = match self.store.get_metadata(region_id).await {
            Ok(metadata) => metadata,
            Err(e) => {
                skip(&mut collection.skipped, SkipScope::Root, region_id, &e);
                return collection;
            }
        };
        let region_name = metadata.entry.name;

        if let Some(parent_id) = metadata.parent_ids.first() {
            match self.store.get_metadata(parent_id).await {
                Ok(parent) => collection.year = extract_year(&parent.entry.name),
                Err(e) => debug!("Could not read parent of {}: {}", region_name, e),
            }
        }

        match self
            .collect_region(region_id, &region_name, &mut collection.skipped)
            .await
        {
            Ok(documents) => {
                info!("{}: {} documents", region_name, documents.len());
                collection.documents = documents;
            }
            Err(e) => skip(&mut collection.skipped, SkipScope::Root, &region_name, &e),
        }

        collection
    }

    /// Collect one region; organization failures are recorded and skipped
    async fn collect_region(
        &self,
        region_id: &str,
        region_name: &str,
        skipped: &mut Vec<SkippedNode>,
    ) -> Result<Vec<CollectedDocument>, S::Error> {
        let organizations = self.store.list_subfolders(region_id).await?;
        let mut documents = Vec::new();

        for organization in organizations {
            let files = match self
                .store
                .list_files(&organization.id, Some(PDF_MIME_TYPE))
                .await
            {
                Ok(files) => files,
                Err(e) => {
                    skip(skipped, SkipScope::Organization, &organization.name, &e);
                    continue;
                }
            };

            let candidates = files.len();
            let accepted = filter_candidates(files);
            debug!(
                "{}/{}: {} of {} candidates accepted",
                region_name,
                organization.name,
                accepted.len(),
                candidates
            );

            documents.extend(accepted.into_iter().map(|(file, match_kind)| CollectedDocument {
                record: DocumentRecord::new(
                    region_name,
                    organization.name.as_str(),
                    &organization.id,
                    file.id,
                    file.name,
                    file.size_bytes,
                    file.web_link,
                    file.created_at,
                    file.modified_at,
                ),
                match_kind,
            }));
        }

        Ok(documents)
    }
}

fn skip(skipped: &mut Vec<SkippedNode>, scope: SkipScope, name: &str, error: &impl fmt::Display) {
    warn!("Skipping {} '{}': {}", scope, name, error);
    skipped.push(SkippedNode {
        scope,
        name: name.to_string(),
        reason: error.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use dresscode_drive::MockFileStore;

    fn target(mode: CollectionMode, root: &str) -> CollectionTarget {
        CollectionTarget::new(mode, Some(root.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_scoped_collects_region_and_year() {
        let mut store = MockFileStore::new();
        store.add_root("year", "2025_校則データ");
        store.add_folder("year", "ward", "港区");
        store.add_folder("ward", "s1", "A中学校");
        store.add_pdf("s1", "f1", "校則.pdf", b"%PDF");

        let collection = FolderCollector::new(&store)
            .collect(&target(CollectionMode::Scoped, "ward"))
            .await;

        assert_eq!(collection.year, "2025");
        assert_eq!(collection.mode, CollectionMode::Scoped);
        let record = &collection.documents[0].record;
        assert_eq!(record.region_name, "港区");
        assert_eq!(record.organization_name, "A中学校");
        assert_eq!(record.storage_path, "港区/A中学校/校則.pdf");
        assert_eq!(
            record.organization_folder_link,
            "https://drive.google.com/drive/folders/s1"
        );
    }

    #[tokio::test]
    async fn test_scoped_without_parent_year_is_unknown() {
        let mut store = MockFileStore::new();
        store.add_root("ward", "港区");

        let collection = FolderCollector::new(&store)
            .collect(&target(CollectionMode::Scoped, "ward"))
            .await;

        assert_eq!(collection.year, UNKNOWN_YEAR);
        assert!(collection.is_empty());
        assert!(collection.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_root_is_skipped() {
        let mut store = MockFileStore::new();
        store.add_root("root", "2025_校則データ");
        store.fail_listing("root");

        let collection = FolderCollector::new(&store)
            .collect(&target(CollectionMode::Batch, "root"))
            .await;

        assert!(collection.is_empty());
        assert_eq!(collection.year, "2025");
        assert_eq!(collection.skipped.len(), 1);
        assert_eq!(collection.skipped[0].scope, SkipScope::Root);
    }

    #[tokio::test]
    async fn test_scoped_missing_root_is_skipped() {
        let store = MockFileStore::new();

        let collection = FolderCollector::new(&store)
            .collect(&target(CollectionMode::Scoped, "nope"))
            .await;

        assert!(collection.is_empty());
        assert_eq!(collection.skipped[0].scope, SkipScope::Root);
        assert_eq!(collection.skipped[0].name, "nope");
    }

    #[tokio::test]
    async fn test_failed_region_listing_is_skipped() {
        let mut store = MockFileStore::new();
        store.add_root("root", "2025_校則データ");
        store.add_folder("root", "w1", "港区");
        store.add_folder("root", "w2", "北区");
        store.add_folder("w2", "s1", "B小学校");
        store.add_pdf("s1", "f1", "きまり.pdf", b"%PDF");
        store.fail_listing("w1");

        let collection = FolderCollector::new(&store)
            .collect(&target(CollectionMode::Batch, "root"))
            .await;

        assert_eq!(collection.len(), 1);
        assert_eq!(
            collection.skipped,
            vec![SkippedNode {
                scope: SkipScope::Region,
                name: "港区".to_string(),
                reason: "Communication error: Injected listing failure for w1".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_non_pdf_files_are_not_candidates() {
        let mut store = MockFileStore::new();
        store.add_root("ward", "港区");
        store.add_folder("ward", "s1", "A中学校");
        store.add_pdf("s1", "f1", "a.pdf", b"%PDF");
        store.add_file("s1", "f2", "校則.docx", "application/msword", b"doc");

        let collection = FolderCollector::new(&store)
            .collect(&target(CollectionMode::Scoped, "ward"))
            .await;

        let names: Vec<_> = collection.records().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf"]);
        assert_eq!(collection.documents[0].match_kind, MatchKind::Potential);
    }
}
