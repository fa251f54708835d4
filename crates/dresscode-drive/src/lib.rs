//! Dresscode Drive
//!
//! File Store Gateway over the Drive v3 REST API.
//!
//! # Providers
//!
//! - `DriveClient`: Drive v3 over HTTPS, shared-drive aware
//! - `MockFileStore`: In-memory folder tree for testing
//!
//! # Examples
//!
//! ```
//! use dresscode_drive::MockFileStore;
//! use dresscode_domain::traits::FileStore;
//!
//! # async fn example() {
//! let mut store = MockFileStore::new();
//! store.add_folder("root", "ward1", "渋谷区");
//! store.add_pdf("ward1", "doc1", "校則.pdf", b"%PDF-1.4");
//!
//! let folders = store.list_subfolders("root").await.unwrap();
//! assert_eq!(folders[0].name, "渋谷区");
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod mock;

use thiserror::Error;

pub use client::DriveClient;
pub use mock::MockFileStore;

/// Errors that can occur during file store operations
#[derive(Error, Debug)]
pub enum DriveError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Item does not exist or is not visible to the account
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Access token could not be obtained
    #[error("Authentication error: {0}")]
    Auth(#[from] dresscode_auth::AuthError),
}

impl From<reqwest::Error> for DriveError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DriveError::InvalidResponse(e.to_string())
        } else {
            DriveError::Communication(e.to_string())
        }
    }
}
