//! Dresscode LLM Provider Layer
//!
//! Document Analysis Gateway implementations of the `DocumentAnalyzer` trait
//! from `dresscode-domain`.
//!
//! # Providers
//!
//! - `MockAnalyzer`: Deterministic mock for testing
//! - `GeminiProvider`: Gemini REST API (file upload + generateContent)
//!
//! Prompts come from a `PromptTemplates` store loaded once at startup.
//!
//! # Examples
//!
//! ```
//! use dresscode_llm::MockAnalyzer;
//! use dresscode_domain::traits::DocumentAnalyzer;
//!
//! # async fn example() {
//! let analyzer = MockAnalyzer::new(r#"{"general": {}}"#);
//! let result = analyzer.analyze(b"%PDF", "rules.pdf").await.unwrap();
//! assert_eq!(result, r#"{"general": {}}"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod gemini;
pub mod prompts;

use dresscode_domain::traits::DocumentAnalyzer;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use gemini::{GeminiProvider, GenerationSettings, ModelInfo};
pub use prompts::PromptTemplates;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Uploaded document never became ready
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Prompt templates or provider settings are unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock analyzer for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Responses can be keyed by document display name.
///
/// # Examples
///
/// ```
/// use dresscode_llm::MockAnalyzer;
/// use dresscode_domain::traits::DocumentAnalyzer;
///
/// # async fn example() {
/// let mut analyzer = MockAnalyzer::default();
/// analyzer.add_response("a.pdf", "response a");
/// analyzer.add_error("b.pdf");
/// assert_eq!(analyzer.analyze(b"", "a.pdf").await.unwrap(), "response a");
/// assert!(analyzer.analyze(b"", "b.pdf").await.is_err());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, Result<String, String>>>>,
    analyzed: Arc<Mutex<Vec<String>>>,
    connection_tests: Arc<Mutex<usize>>,
    connection_fails: bool,
    model_name: String,
}

impl MockAnalyzer {
    /// Create a new MockAnalyzer with a fixed response for all documents
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            analyzed: Arc::new(Mutex::new(Vec::new())),
            connection_tests: Arc::new(Mutex::new(0)),
            connection_fails: false,
            model_name: "mock-model".to_string(),
        }
    }

    /// Add a specific response for a given display name
    pub fn add_response(&mut self, display_name: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(display_name.into(), Ok(response.into()));
    }

    /// Configure to return an error for a specific display name
    pub fn add_error(&mut self, display_name: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(display_name.into(), Err("Mock error".to_string()));
    }

    /// Make the connection test fail
    pub fn fail_connection(&mut self) {
        self.connection_fails = true;
    }

    /// Number of connection tests run
    pub fn connection_tests(&self) -> usize {
        *self.connection_tests.lock().unwrap()
    }

    /// Get the number of times analyze was called
    pub fn call_count(&self) -> usize {
        self.analyzed.lock().unwrap().len()
    }

    /// Display names analyzed so far, in call order
    pub fn analyzed(&self) -> Vec<String> {
        self.analyzed.lock().unwrap().clone()
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl DocumentAnalyzer for MockAnalyzer {
    type Error = LlmError;

    async fn analyze(&self, _document: &[u8], display_name: &str) -> Result<String, LlmError> {
        self.analyzed.lock().unwrap().push(display_name.to_string());

        let responses = self.responses.lock().unwrap();
        match responses.get(display_name) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(LlmError::Other(message.clone())),
            None => Ok(self.default_response.clone()),
        }
    }

    async fn test_connection(&self) -> Result<(), LlmError> {
        *self.connection_tests.lock().unwrap() += 1;
        if self.connection_fails {
            return Err(LlmError::ModelNotAvailable(self.model_name.clone()));
        }
        Ok(())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
