//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential error
    #[error("Authentication error: {0}")]
    Auth(#[from] dresscode_auth::AuthError),

    /// File store error
    #[error("Drive error: {0}")]
    Drive(#[from] dresscode_drive::DriveError),

    /// Analysis service error
    #[error("Gemini error: {0}")]
    Llm(#[from] dresscode_llm::LlmError),

    /// Spreadsheet error
    #[error("Sheets error: {0}")]
    Sheets(#[from] dresscode_sheets::SheetsError),

    /// Run aborted before processing
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] dresscode_pipeline::PipelineError),

    /// Folder tree is not usable
    #[error("Drive structure check failed:\n{0}")]
    Structure(String),
}
