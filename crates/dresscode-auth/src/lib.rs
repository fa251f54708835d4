//! Dresscode Auth
//!
//! Service-account authentication for the file store and spreadsheet
//! gateways.
//!
//! A service-account key file is read once; access tokens are obtained with
//! the OAuth2 JWT bearer grant and cached until shortly before they expire.
//!
//! # Examples
//!
//! ```no_run
//! use dresscode_auth::{ServiceAccountKey, TokenProvider, scopes};
//!
//! # async fn example() -> Result<(), dresscode_auth::AuthError> {
//! let key = ServiceAccountKey::from_file("credentials.json")?;
//! let tokens = TokenProvider::new(key, &[scopes::DRIVE_READONLY]);
//! let token = tokens.access_token().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod service_account;

pub use error::AuthError;
pub use service_account::{AssertionClaims, ServiceAccountKey, TokenProvider};

/// OAuth scopes used by the gateways
pub mod scopes {
    /// Read-only access to the file store
    pub const DRIVE_READONLY: &str = "https://www.googleapis.com/auth/drive.readonly";

    /// Read/write access to spreadsheets
    pub const SPREADSHEETS: &str = "https://www.googleapis.com/auth/spreadsheets";

    /// Full file-store access (needed to open spreadsheets shared via drive)
    pub const DRIVE: &str = "https://www.googleapis.com/auth/drive";
}
