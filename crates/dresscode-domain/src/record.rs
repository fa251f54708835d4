//! Document records produced by folder collection

/// URL prefix for a folder in the file store's web UI
pub const ORGANIZATION_FOLDER_URL_PREFIX: &str = "https://drive.google.com/drive/folders/";

/// Build the web link for an organization folder from its identifier
///
/// The link is derived, never fetched.
///
/// # Examples
///
/// ```
/// use dresscode_domain::organization_folder_link;
///
/// assert_eq!(
///     organization_folder_link("abc123"),
///     "https://drive.google.com/drive/folders/abc123"
/// );
/// ```
pub fn organization_folder_link(folder_id: &str) -> String {
    format!("{}{}", ORGANIZATION_FOLDER_URL_PREFIX, folder_id)
}

/// Convert a byte count to megabytes rounded to two decimals
pub fn bytes_to_megabytes(size_bytes: u64) -> f64 {
    let mb = size_bytes as f64 / 1024.0 / 1024.0;
    (mb * 100.0).round() / 100.0
}

/// A candidate regulation document found during collection
///
/// Records are immutable once constructed and live for a single run.
/// `file_id` is the only identity; nothing deduplicates across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    /// Region (ward) folder name
    pub region_name: String,

    /// Organization (school) folder name
    pub organization_name: String,

    /// File identifier in the store
    pub file_id: String,

    /// File display name
    pub file_name: String,

    /// File size in megabytes, two decimals
    pub size_in_megabytes: f64,

    /// `region/organization/file_name`
    pub storage_path: String,

    /// Web view link reported by the store (may be empty)
    pub web_link: String,

    /// Creation timestamp as reported by the store (RFC 3339, may be empty)
    pub created_at: String,

    /// Modification timestamp as reported by the store (RFC 3339, may be empty)
    pub modified_at: String,

    /// Link to the organization's folder
    pub organization_folder_link: String,
}

impl DocumentRecord {
    /// Create a new record, deriving the storage path and folder link
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        region_name: impl Into<String>,
        organization_name: impl Into<String>,
        organization_folder_id: &str,
        file_id: impl Into<String>,
        file_name: impl Into<String>,
        size_bytes: u64,
        web_link: impl Into<String>,
        created_at: impl Into<String>,
        modified_at: impl Into<String>,
    ) -> Self {
        let region_name = region_name.into();
        let organization_name = organization_name.into();
        let file_name = file_name.into();
        let storage_path = format!("{}/{}/{}", region_name, organization_name, file_name);

        Self {
            region_name,
            organization_name,
            file_id: file_id.into(),
            file_name,
            size_in_megabytes: bytes_to_megabytes(size_bytes),
            storage_path,
            web_link: web_link.into(),
            created_at: created_at.into(),
            modified_at: modified_at.into(),
            organization_folder_link: organization_folder_link(organization_folder_id),
        }
    }
}
