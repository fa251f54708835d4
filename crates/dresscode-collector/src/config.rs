//! Collection target configuration

use crate::CollectorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the root folder is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollectionMode {
    /// Root is a single region folder; its subfolders are organizations
    #[default]
    Scoped,

    /// Root holds region folders; only allow-listed names are processed
    Batch,
}

impl CollectionMode {
    /// Pick the mode from the batch flag
    pub fn from_batch_flag(batch: bool) -> Self {
        if batch {
            CollectionMode::Batch
        } else {
            CollectionMode::Scoped
        }
    }

    /// Human-readable label used in summaries
    pub fn label(&self) -> &'static str {
        match self {
            CollectionMode::Scoped => "scoped",
            CollectionMode::Batch => "batch",
        }
    }
}

impl fmt::Display for CollectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated mode plus the root folder it applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionTarget {
    mode: CollectionMode,
    root_id: String,
}

impl CollectionTarget {
    /// Create a target, rejecting an absent or blank identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use dresscode_collector::{CollectionMode, CollectionTarget, CollectorError};
    ///
    /// let target = CollectionTarget::new(CollectionMode::Batch, Some("root".to_string())).unwrap();
    /// assert_eq!(target.root_id(), "root");
    ///
    /// let missing = CollectionTarget::new(CollectionMode::Scoped, None);
    /// assert_eq!(missing, Err(CollectorError::MissingRoot(CollectionMode::Scoped)));
    /// ```
    pub fn new(mode: CollectionMode, root_id: Option<String>) -> Result<Self, CollectorError> {
        match root_id {
            Some(id) if !id.trim().is_empty() => Ok(Self {
                mode,
                root_id: id.trim().to_string(),
            }),
            _ => Err(CollectorError::MissingRoot(mode)),
        }
    }

    /// Collection mode
    pub fn mode(&self) -> CollectionMode {
        self.mode
    }

    /// Root folder identifier
    pub fn root_id(&self) -> &str {
        &self.root_id
    }
}
