//! Service-account key handling and token exchange

use crate::error::AuthError;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tracing::debug;

/// Default OAuth token endpoint
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Lifetime requested for each assertion
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// Tokens are refreshed this long before they expire
const EXPIRY_MARGIN_SECS: u64 = 60;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Current timestamp in seconds since Unix epoch
fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

/// The fields of a service-account key file that the token exchange needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account e-mail (assertion issuer)
    pub client_email: String,

    /// PEM-encoded RSA private key
    pub private_key: String,

    /// Token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Load a key from a JSON key file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a key from its JSON text
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let key: ServiceAccountKey =
            serde_json::from_str(json).map_err(|e| AuthError::InvalidKey(e.to_string()))?;

        if key.client_email.is_empty() {
            return Err(AuthError::InvalidKey("client_email is empty".to_string()));
        }
        if !key.private_key.contains("PRIVATE KEY") {
            return Err(AuthError::InvalidKey(
                "private_key is not a PEM private key".to_string(),
            ));
        }

        Ok(key)
    }
}

/// JWT claims of the bearer assertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Issuer: the service account e-mail
    pub iss: String,

    /// Space-separated scopes
    pub scope: String,

    /// Audience: the token endpoint
    pub aud: String,

    /// Issued at (Unix epoch)
    pub iat: u64,

    /// Expiry (Unix epoch)
    pub exp: u64,
}

impl AssertionClaims {
    /// Build claims for the given key and scopes, issued at `now`
    pub fn new(key: &ServiceAccountKey, scopes: &[&str], now: u64) -> Self {
        Self {
            iss: key.client_email.clone(),
            scope: scopes.join(" "),
            aud: key.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: u64,
}

/// Issues and caches access tokens for one key and scope set
pub struct TokenProvider {
    key: ServiceAccountKey,
    scopes: Vec<String>,
    client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// Create a provider for the given scopes
    pub fn new(key: ServiceAccountKey, scopes: &[&str]) -> Self {
        Self {
            key,
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            client: reqwest::Client::new(),
            cached: Mutex::new(None),
        }
    }

    /// Create a provider that always returns a fixed token
    ///
    /// Used for tests and for tokens obtained out of band.
    pub fn with_static_token(token: impl Into<String>) -> Self {
        let key = ServiceAccountKey {
            client_email: String::new(),
            private_key: String::new(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
        };
        Self {
            key,
            scopes: Vec::new(),
            client: reqwest::Client::new(),
            cached: Mutex::new(Some(CachedToken {
                value: token.into(),
                expires_at: u64::MAX,
            })),
        }
    }

    /// Get a valid access token, exchanging a new assertion when needed
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > now_secs() + EXPIRY_MARGIN_SECS {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.exchange().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    /// Sign an assertion for the configured scopes
    pub fn sign_assertion(&self, now: u64) -> Result<String, AuthError> {
        let scopes: Vec<&str> = self.scopes.iter().map(String::as_str).collect();
        let claims = AssertionClaims::new(&self.key, &scopes, now);
        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)?)
    }

    async fn exchange(&self) -> Result<CachedToken, AuthError> {
        let now = now_secs();
        let assertion = self.sign_assertion(now)?;

        debug!("Exchanging assertion for {} at {}", self.key.client_email, self.key.token_uri);

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AuthError::TokenExchange(format!("HTTP {}: {}", status, error_text)));
        }

        let token: TokenResponse = response.json().await?;
        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + token.expires_in,
        })
    }
}
