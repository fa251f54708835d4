//! Gemini Provider Implementation
//!
//! Analyzes documents through the Gemini REST API. One analysis is three
//! steps:
//!
//! 1. Upload the PDF with the resumable upload protocol and wait until the
//!    file leaves the `PROCESSING` state
//! 2. Call `generateContent` with the system prompt, the rendered user prompt
//!    and a reference to the uploaded file
//! 3. Delete the uploaded file (failure is only logged)
//!
//! # Examples
//!
//! ```no_run
//! use dresscode_llm::{GeminiProvider, PromptTemplates};
//!
//! let prompts = PromptTemplates::new("system", "Analyze {file_name}").unwrap();
//! let provider = GeminiProvider::new("api-key", "gemini-2.5-flash", prompts).unwrap();
//! ```

use crate::{LlmError, PromptTemplates};
use dresscode_domain::traits::{DocumentAnalyzer, PDF_MIME_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default timeout for a single request (300 seconds; long PDFs are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Delay between upload state polls
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// State polls before giving up on an upload
pub const MAX_POLLS: u32 = 120;

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

const CONNECTION_TEST_PROMPT: &str = "これはテストです。'OK'とだけ返答してください。";

/// Sampling parameters sent with every generation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling mass
    pub top_p: f32,

    /// Top-k sampling cutoff
    pub top_k: u32,

    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
        }
    }
}

impl GenerationSettings {
    /// Check that every parameter is in range
    pub fn validate(&self) -> Result<(), LlmError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(LlmError::Config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(LlmError::Config(format!(
                "top_p must be within 0.0..=1.0, got {}",
                self.top_p
            )));
        }
        if self.top_k == 0 {
            return Err(LlmError::Config("top_k must be greater than 0".to_string()));
        }
        if self.max_output_tokens == 0 {
            return Err(LlmError::Config(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// A model offered by the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Resource name, e.g. `models/gemini-2.5-flash`
    pub name: String,

    /// Human-readable name
    #[serde(default)]
    pub display_name: String,

    /// Methods the model supports
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// True when the model can serve `generateContent`
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// File resource returned by the Files API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedFile {
    name: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl UploadedFile {
    fn state(&self) -> &str {
        self.state.as_deref().unwrap_or("ACTIVE")
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationSettings,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    Text(&'a str),
    FileData {
        #[serde(rename = "mimeType")]
        mime_type: &'a str,
        #[serde(rename = "fileUri")]
        file_uri: &'a str,
    },
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

fn block_none_safety_settings() -> Vec<SafetySetting> {
    HARM_CATEGORIES
        .iter()
        .map(|&category| SafetySetting {
            category,
            threshold: "BLOCK_NONE",
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Result<String, LlmError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("Response has no candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::InvalidResponse(format!(
                "Empty response (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("UNKNOWN")
            )));
        }
        Ok(text)
    }
}

/// Gemini API provider for document analysis
pub struct GeminiProvider {
    endpoint: String,
    api_key: String,
    model: String,
    settings: GenerationSettings,
    prompts: PromptTemplates,
    client: reqwest::Client,
}

/// What a request addressed, for mapping a 404
#[derive(Debug, Clone, Copy)]
enum Resource<'a> {
    Model,
    File(&'a str),
    Collection,
}

impl GeminiProvider {
    /// Create a new provider against the public endpoint
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` when the API key or model name is empty.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        prompts: PromptTemplates,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        let model = model.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("Gemini API key is not set".to_string()));
        }
        if model.trim().is_empty() {
            return Err(LlmError::Config("Gemini model name is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            model,
            settings: GenerationSettings::default(),
            prompts,
            client,
        })
    }

    /// Use a different API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Use different sampling parameters
    pub fn with_settings(mut self, settings: GenerationSettings) -> Result<Self, LlmError> {
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }

    /// Sampling parameters in use
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    fn model_path(&self) -> String {
        if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        }
    }

    /// List models that can serve `generateContent`
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        let url = format!("{}/v1beta/models", self.endpoint);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params: Vec<(&str, &str)> = vec![("key", self.api_key.as_str()), ("pageSize", "1000")];
            if let Some(page_token) = page_token.as_deref() {
                params.push(("pageToken", page_token));
            }

            let response = self.client.get(&url).query(&params).send().await?;
            let response = check_status(response, Resource::Collection, &self.model).await?;
            let page: ModelList = response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse model list: {}", e)))?;

            models.extend(page.models.into_iter().filter(ModelInfo::supports_generation));
            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        Ok(models)
    }

    /// Upload a document, returning the file once it is usable
    async fn upload(&self, document: &[u8], display_name: &str) -> Result<UploadedFile, LlmError> {
        let start_url = format!("{}/upload/v1beta/files", self.endpoint);
        let metadata = serde_json::json!({ "file": { "display_name": display_name } });

        let response = self
            .client
            .post(&start_url)
            .query(&[("key", &self.api_key)])
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", document.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", PDF_MIME_TYPE)
            .json(&metadata)
            .send()
            .await?;
        let response = check_status(response, Resource::Collection, &self.model).await?;

        let upload_url = response
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| LlmError::UploadFailed(format!("No upload URL for {}", display_name)))?;

        let response = self
            .client
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(document.to_vec())
            .send()
            .await?;
        let response = check_status(response, Resource::Collection, &self.model).await?;
        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse upload response: {}", e)))?;

        debug!("Uploaded {} as {}", display_name, uploaded.file.name);
        Ok(uploaded.file)
    }

    /// Poll until the file is no longer `PROCESSING`
    async fn wait_until_active(&self, mut file: UploadedFile) -> Result<UploadedFile, LlmError> {
        let mut polls = 0;
        while file.state() == "PROCESSING" {
            if polls >= MAX_POLLS {
                return Err(LlmError::UploadFailed(format!(
                    "{} still processing after {} polls",
                    file.name, polls
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
            polls += 1;

            let url = format!("{}/v1beta/{}", self.endpoint, file.name);
            let response = self
                .client
                .get(&url)
                .query(&[("key", &self.api_key)])
                .send()
                .await?;
            let response = check_status(response, Resource::File(&file.name), &self.model).await?;
            file = response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse file state: {}", e)))?;
        }

        if file.state() == "FAILED" {
            return Err(LlmError::UploadFailed(format!("Processing failed for {}", file.name)));
        }
        Ok(file)
    }

    async fn delete(&self, file: &UploadedFile) {
        let url = format!("{}/v1beta/{}", self.endpoint, file.name);
        let result = self
            .client
            .delete(&url)
            .query(&[("key", &self.api_key)])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!("Deleted uploaded file {}", file.name);
            }
            Ok(response) => warn!("Failed to delete uploaded file {}: HTTP {}", file.name, response.status()),
            Err(e) => warn!("Failed to delete uploaded file {}: {}", file.name, e),
        }
    }

    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, LlmError> {
        let url = format!("{}/v1beta/{}:generateContent", self.endpoint, self.model_path());

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(request)
            .send()
            .await?;
        let response = check_status(response, Resource::Model, &self.model).await?;
        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        body.into_text()
    }

    async fn analyze_uploaded(&self, file: UploadedFile, display_name: &str) -> Result<String, LlmError> {
        let file = self.wait_until_active(file).await?;
        let user_prompt = self.prompts.render_user_prompt(display_name);
        let mime_type = file.mime_type.as_deref().unwrap_or(PDF_MIME_TYPE);

        let request = GenerateRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::Text(self.prompts.system_prompt())],
            }),
            contents: vec![Content {
                role: Some("user"),
                parts: vec![
                    Part::Text(&user_prompt),
                    Part::FileData {
                        mime_type,
                        file_uri: &file.uri,
                    },
                ],
            }],
            generation_config: self.settings,
            safety_settings: block_none_safety_settings(),
        };

        self.generate(&request).await
    }
}

/// Pass successful responses through; map failures onto error kinds
async fn check_status(
    response: reqwest::Response,
    resource: Resource<'_>,
    model: &str,
) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(status_error(status, error_text, resource, model))
}

fn status_error(
    status: reqwest::StatusCode,
    error_text: String,
    resource: Resource<'_>,
    model: &str,
) -> LlmError {
    match (status, resource) {
        (reqwest::StatusCode::TOO_MANY_REQUESTS, _) => LlmError::RateLimitExceeded(error_text),
        (reqwest::StatusCode::NOT_FOUND, Resource::Model) => LlmError::ModelNotAvailable(model.to_string()),
        (reqwest::StatusCode::NOT_FOUND, Resource::File(name)) => {
            LlmError::UploadFailed(format!("{} no longer exists", name))
        }
        _ => LlmError::Communication(format!("HTTP {}: {}", status, error_text)),
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Communication(format!("Request failed: {}", e))
    }
}

impl DocumentAnalyzer for GeminiProvider {
    type Error = LlmError;

    async fn analyze(&self, document: &[u8], display_name: &str) -> Result<String, LlmError> {
        let started = std::time::Instant::now();
        info!("Analyzing {}", display_name);

        let file = self.upload(document, display_name).await?;
        let result = self.analyze_uploaded(file.clone(), display_name).await;
        self.delete(&file).await;

        if result.is_ok() {
            info!(
                "Analysis finished for {} ({:.2}s)",
                display_name,
                started.elapsed().as_secs_f64()
            );
        }
        result
    }

    /// Send a tiny text-only request to check key and model
    async fn test_connection(&self) -> Result<(), LlmError> {
        let settings = GenerationSettings {
            temperature: 0.0,
            max_output_tokens: 10,
            ..self.settings
        };
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part::Text(CONNECTION_TEST_PROMPT)],
            }],
            generation_config: settings,
            safety_settings: block_none_safety_settings(),
        };

        self.generate(&request).await?;
        info!("Gemini connection test succeeded for {}", self.model);
        Ok(())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
