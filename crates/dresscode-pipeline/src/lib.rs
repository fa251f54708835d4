//! Dresscode Pipeline
//!
//! Orchestrates one survey run:
//!
//! ```text
//! validate config → open worksheet → collect
//!   └─ per organization, per document:
//!        download → analyze → extract JSON → flatten → append
//! → summary
//! ```
//!
//! # Failure handling
//!
//! Configuration problems and a missing worksheet end the run before any
//! document is touched (`PipelineError`). Everything after that is a
//! per-document `DocumentFailure`, counted in `RunMetrics` and logged; the
//! run always continues with the next document.
//!
//! # Pacing
//!
//! A fixed delay follows every document. `TokioPacer` sleeps;
//! `RecordingPacer` only records, for tests.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod metrics;
pub mod pacer;
pub mod parser;
pub mod pipeline;
pub mod types;

pub use config::PipelineConfig;
pub use error::{DocumentFailure, FailureStage, ParseError, PipelineError};
pub use metrics::RunMetrics;
pub use pacer::{RecordingPacer, TokioPacer};
pub use parser::extract_json;
pub use pipeline::Pipeline;
pub use types::RunReport;
