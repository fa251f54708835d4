//! Error types for authentication

use thiserror::Error;

/// Errors that can occur while obtaining access tokens
#[derive(Error, Debug)]
pub enum AuthError {
    /// Key file could not be read
    #[error("Failed to read credentials file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Key file is not a valid service-account key
    #[error("Invalid service account key: {0}")]
    InvalidKey(String),

    /// Assertion could not be signed
    #[error("Failed to sign assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// Token endpoint unreachable or rejected the request
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::TokenExchange(e.to_string())
    }
}
