//! Dresscode Sheets
//!
//! Everything between a parsed analysis and a worksheet row:
//!
//! - `AnalysisResult`: the parsed tree, with reserved `_` keys stripped
//! - `lookup`: total nested lookup over the tree
//! - `schema`: the ordered column table
//! - `flatten`: header and row generation from that table
//! - `writer`: header-once appends
//! - `SheetsClient` / `MockSpreadsheet`: Spreadsheet Gateway implementations
//!
//! # Examples
//!
//! ```
//! use dresscode_sheets::{writer, AnalysisResult, MockSpreadsheet};
//! use serde_json::json;
//!
//! # async fn example() {
//! let spreadsheet = MockSpreadsheet::new();
//! let sheet = spreadsheet.add_sheet("回答");
//!
//! let result = AnalysisResult::from_value(json!({"general": {}})).unwrap();
//! let outcome = writer::write_result(&sheet, &result).await.unwrap();
//! assert!(outcome.header_written);
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod flatten;
pub mod lookup;
pub mod mock;
pub mod result;
pub mod schema;
pub mod writer;

use thiserror::Error;

pub use client::{SheetsClient, SheetsWorksheet};
pub use mock::{MockSpreadsheet, MockWorksheet};
pub use result::{AnalysisMetadata, AnalysisResult};
pub use writer::WriteOutcome;

/// Errors that can occur during spreadsheet operations
#[derive(Error, Debug)]
pub enum SheetsError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Spreadsheet or range does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Parsed analysis is not a mapping
    #[error("Invalid analysis result: {0}")]
    InvalidResult(String),

    /// Access token could not be obtained
    #[error("Authentication error: {0}")]
    Auth(#[from] dresscode_auth::AuthError),
}

impl From<reqwest::Error> for SheetsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SheetsError::InvalidResponse(e.to_string())
        } else {
            SheetsError::Communication(e.to_string())
        }
    }
}
