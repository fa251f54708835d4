//! Error types for pipeline runs

use dresscode_collector::CollectorError;
use std::fmt;
use thiserror::Error;

/// Errors that end a run before any document is processed
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Required setting missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Collection target could not be built
    #[error("Collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Target spreadsheet could not be opened
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Analysis service rejected the connection test
    #[error("Analyzer error: {0}")]
    Analyzer(String),
}

/// No JSON object could be recovered from a response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Neither a fenced block nor a brace-delimited span was found
    #[error("No JSON found in response")]
    NoJson,

    /// The candidate text is not valid JSON
    #[error("Malformed JSON: {0}")]
    Malformed(String),

    /// Valid JSON, but not an object
    #[error("Expected a JSON object")]
    NotAnObject,
}

/// Stage at which a document failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureStage {
    /// Fetching bytes from the file store
    Download,

    /// Calling the analysis service
    Analysis,

    /// Extracting JSON from the response
    Parse,

    /// Appending to the worksheet
    Write,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureStage::Download => "download",
            FailureStage::Analysis => "analysis",
            FailureStage::Parse => "parse",
            FailureStage::Write => "write",
        })
    }
}

/// Why one document produced no row
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentFailure {
    /// File store error
    #[error("Download failed: {0}")]
    Download(String),

    /// Analysis service error
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// Response held no usable JSON
    #[error("Parse failed: {0}")]
    Parse(#[from] ParseError),

    /// Worksheet rejected the row
    #[error("Write failed: {0}")]
    Write(String),
}

impl DocumentFailure {
    /// Stage the failure happened at
    pub fn stage(&self) -> FailureStage {
        match self {
            DocumentFailure::Download(_) => FailureStage::Download,
            DocumentFailure::Analysis(_) => FailureStage::Analysis,
            DocumentFailure::Parse(_) => FailureStage::Parse,
            DocumentFailure::Write(_) => FailureStage::Write,
        }
    }
}
