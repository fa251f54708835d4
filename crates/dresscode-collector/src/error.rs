//! Error types for the Folder Collector

use crate::config::CollectionMode;
use thiserror::Error;

/// Errors that can occur before collection starts
///
/// Failures inside the folder tree are never errors; they are recorded as
/// skipped nodes on the `Collection`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CollectorError {
    /// The identifier required by the mode is absent
    #[error("Missing root folder identifier for {0} collection")]
    MissingRoot(CollectionMode),
}
