//! Dresscode Collector
//!
//! Finds candidate regulation documents in the file store.
//!
//! # Folder layout
//!
//! ```text
//! 2025_校則データ/          root (batch mode)
//! ├── 渋谷区/               region (root in scoped mode)
//! │   ├── XX中学校/         organization
//! │   │   ├── 校則.pdf      document
//! ```
//!
//! In batch mode only region folders named in [`region::REGION_NAMES`] are
//! walked. Inside each organization, PDFs pass the keyword filter in
//! [`filter`].
//!
//! # Failure handling
//!
//! A region or organization that cannot be listed is logged and skipped;
//! collection carries on with its siblings. The only error is a missing root
//! identifier, raised when the target is built.

#![warn(missing_docs)]

pub mod collector;
pub mod config;
pub mod error;
pub mod filter;
pub mod region;
pub mod summary;
pub mod validate;

pub use collector::{CollectedDocument, Collection, FolderCollector, SkipScope, SkippedNode};
pub use config::{CollectionMode, CollectionTarget};
pub use error::CollectorError;
pub use filter::MatchKind;
pub use summary::{summarize, CollectionSummary};
pub use validate::{validate_structure, StructureReport};
