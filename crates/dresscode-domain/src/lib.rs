//! Dresscode Domain Layer
//!
//! Core data model and gateway interfaces for the dress-code survey pipeline.
//! The crate performs no I/O; it defines the records that flow through a run and
//! the trait boundaries the infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **DocumentRecord**: one candidate regulation document and its position in
//!   the region → organization → document hierarchy
//! - **OrganizationGroup**: the documents of one organization within one region
//! - **RunId**: UUIDv7 identifier stamped on every analysis of a run
//! - **Gateways**: file store, document analyzer, spreadsheet and worksheet
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Infrastructure implementations live in the gateway crates
//! - Every gateway call is awaited in sequence by the pipeline; nothing here
//!   requires `Send`

#![warn(missing_docs)]
#![warn(clippy::all)]
// Pipeline futures are driven on a single task.
#![allow(async_fn_in_trait)]

pub mod group;
pub mod record;
pub mod run;
pub mod traits;

// Re-exports for convenience
pub use group::{group_by_organization, OrganizationGroup};
pub use record::{organization_folder_link, DocumentRecord, ORGANIZATION_FOLDER_URL_PREFIX};
pub use run::RunId;
