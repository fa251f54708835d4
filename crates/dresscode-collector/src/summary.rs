//! Collection summary

use crate::config::CollectionMode;
use dresscode_domain::DocumentRecord;
use std::collections::HashSet;

/// Counts describing a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Distinct (region, organization) pairs
    pub organization_count: usize,

    /// Documents collected
    pub document_count: usize,

    /// Mode the collection ran in
    pub mode: CollectionMode,
}

/// Summarize records; organizations are counted per region
pub fn summarize<'a, I>(records: I, mode: CollectionMode) -> CollectionSummary
where
    I: IntoIterator<Item = &'a DocumentRecord>,
{
    let mut organizations = HashSet::new();
    let mut document_count = 0;
    for record in records {
        organizations.insert((record.region_name.as_str(), record.organization_name.as_str()));
        document_count += 1;
    }

    CollectionSummary {
        organization_count: organizations.len(),
        document_count,
        mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(region: &str, org: &str, file: &str) -> DocumentRecord {
        DocumentRecord::new(region, org, "folder", file, file, 0, "", "", "")
    }

    #[test]
    fn test_same_name_in_two_regions_counts_twice() {
        let records = vec![
            record("港区", "第一中学校", "a"),
            record("北区", "第一中学校", "b"),
            record("北区", "第一中学校", "c"),
        ];

        let summary = summarize(&records, CollectionMode::Batch);
        assert_eq!(summary.organization_count, 2);
        assert_eq!(summary.document_count, 3);
    }

    #[test]
    fn test_empty() {
        let summary = summarize(&[], CollectionMode::Scoped);
        assert_eq!(summary.organization_count, 0);
        assert_eq!(summary.document_count, 0);
        assert_eq!(summary.mode, CollectionMode::Scoped);
    }
}
