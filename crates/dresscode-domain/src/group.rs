//! Grouping of document records by organization

use crate::DocumentRecord;

/// The documents of one organization within one region
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationGroup {
    /// Region (ward) name
    pub region_name: String,

    /// Organization (school) name
    pub organization_name: String,

    /// Link to the organization's folder
    pub organization_folder_link: String,

    /// Documents in collection order
    pub documents: Vec<DocumentRecord>,
}

impl OrganizationGroup {
    /// Number of documents in the group
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when the group holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Group records on `(region_name, organization_name)`
///
/// Groups appear in the order their first record appears, and records keep
/// their relative order inside each group. The same organization name under
/// two regions yields two groups.
pub fn group_by_organization(records: Vec<DocumentRecord>) -> Vec<OrganizationGroup> {
    let mut groups: Vec<OrganizationGroup> = Vec::new();

    for record in records {
        let existing = groups.iter_mut().find(|g| {
            g.region_name == record.region_name && g.organization_name == record.organization_name
        });

        match existing {
            Some(group) => group.documents.push(record),
            None => groups.push(OrganizationGroup {
                region_name: record.region_name.clone(),
                organization_name: record.organization_name.clone(),
                organization_folder_link: record.organization_folder_link.clone(),
                documents: vec![record],
            }),
        }
    }

    groups
}
