//! Pre-flight check of the folder structure

use crate::config::{CollectionMode, CollectionTarget};
use crate::region::is_recognized_region;
use dresscode_domain::traits::FileStore;
use std::fmt;

/// Outcome of a structure check
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructureReport {
    /// False when the store could not be read
    pub valid: bool,

    /// Fatal problems
    pub errors: Vec<String>,

    /// Problems that leave nothing to collect
    pub warnings: Vec<String>,

    /// Name of the root folder (batch) or region folder (scoped)
    pub root_name: Option<String>,

    /// Subfolders directly under the root
    pub subfolder_count: usize,

    /// Allow-listed region names found under the root (batch mode only)
    pub recognized_regions: Vec<String>,
}

impl StructureReport {
    /// Multi-line human-readable report
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Structure check: {}",
            if self.valid { "OK" } else { "FAILED" }
        )];
        if let Some(name) = &self.root_name {
            lines.push(format!("  Root folder: {}", name));
        }
        lines.push(format!("  Subfolders: {}", self.subfolder_count));
        if !self.recognized_regions.is_empty() {
            lines.push(format!(
                "  Recognized regions ({}): {}",
                self.recognized_regions.len(),
                self.recognized_regions.join(", ")
            ));
        }
        lines.extend(self.warnings.iter().map(|w| format!("  Warning: {}", w)));
        lines.extend(self.errors.iter().map(|e| format!("  Error: {}", e)));
        lines.join("\n")
    }
}

/// Check that the target's folder tree is reachable and non-empty
pub async fn validate_structure<S>(store: &S, target: &CollectionTarget) -> StructureReport
where
    S: FileStore,
    S::Error: fmt::Display,
{
    let mut report = StructureReport {
        valid: true,
        ..Default::default()
    };

    if let Err(e) = inspect(store, target, &mut report).await {
        report.valid = false;
        report.errors.push(format!("Could not read folder structure: {}", e));
    }
    report
}

async fn inspect<S: FileStore>(
    store: &S,
    target: &CollectionTarget,
    report: &mut StructureReport,
) -> Result<(), S::Error> {
    let root = store.get_metadata(target.root_id()).await?;
    report.root_name = Some(root.entry.name);

    let subfolders = store.list_subfolders(target.root_id()).await?;
    report.subfolder_count = subfolders.len();

    match target.mode() {
        CollectionMode::Batch => {
            report.recognized_regions = subfolders
                .into_iter()
                .filter(|f| is_recognized_region(&f.name))
                .map(|f| f.name)
                .collect();
            if report.recognized_regions.is_empty() {
                report.warnings.push("No recognized region folders found".to_string());
            }
        }
        CollectionMode::Scoped => {
            if report.subfolder_count == 0 {
                report.warnings.push("No organization folders found".to_string());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dresscode_drive::MockFileStore;

    fn target(mode: CollectionMode, root: &str) -> CollectionTarget {
        CollectionTarget::new(mode, Some(root.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_batch_structure() {
        let mut store = MockFileStore::new();
        store.add_root("root", "2025_校則データ");
        store.add_folder("root", "w1", "渋谷区");
        store.add_folder("root", "w2", "横浜市");

        let report = validate_structure(&store, &target(CollectionMode::Batch, "root")).await;
        assert!(report.valid);
        assert_eq!(report.root_name.as_deref(), Some("2025_校則データ"));
        assert_eq!(report.subfolder_count, 2);
        assert_eq!(report.recognized_regions, vec!["渋谷区"]);
        assert!(report.warnings.is_empty());
        assert!(report.summary().contains("Recognized regions (1): 渋谷区"));
    }

    #[tokio::test]
    async fn test_batch_without_regions_warns() {
        let mut store = MockFileStore::new();
        store.add_root("root", "2025_校則データ");
        store.add_folder("root", "w1", "misc");

        let report = validate_structure(&store, &target(CollectionMode::Batch, "root")).await;
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_scoped_without_organizations_warns() {
        let mut store = MockFileStore::new();
        store.add_root("ward", "渋谷区");

        let report = validate_structure(&store, &target(CollectionMode::Scoped, "ward")).await;
        assert!(report.valid);
        assert_eq!(report.warnings, vec!["No organization folders found"]);
    }

    #[tokio::test]
    async fn test_unreachable_root_is_invalid() {
        let store = MockFileStore::new();

        let report = validate_structure(&store, &target(CollectionMode::Batch, "missing")).await;
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.summary().contains("FAILED"));
    }
}
