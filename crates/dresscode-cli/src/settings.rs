//! Turn parsed arguments into validated configuration and gateway clients

use crate::cli::{GeminiArgs, GoogleArgs};
use crate::error::{CliError, Result};
use dresscode_auth::{scopes, ServiceAccountKey, TokenProvider};
use dresscode_collector::CollectionMode;
use dresscode_drive::DriveClient;
use dresscode_llm::{GeminiProvider, GenerationSettings, PromptTemplates};
use dresscode_pipeline::PipelineConfig;
use dresscode_sheets::SheetsClient;
use std::sync::Arc;
use tracing::debug;

impl GoogleArgs {
    /// Collection mode selected by the batch flag
    pub fn mode(&self) -> CollectionMode {
        CollectionMode::from_batch_flag(self.batch)
    }

    /// Validated pipeline configuration
    pub fn pipeline_config(&self, document_delay_ms: u64) -> Result<PipelineConfig> {
        let config = PipelineConfig {
            mode: self.mode(),
            root_folder_id: self.root_folder_id.clone(),
            ward_folder_id: self.ward_folder_id.clone(),
            spreadsheet_id: self.spreadsheet_id.clone().unwrap_or_default(),
            sheet_name: self.worksheet_name.clone(),
            document_delay_ms,
            ..PipelineConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Service-account key from the credentials file
    pub fn service_account_key(&self) -> Result<ServiceAccountKey> {
        let path = self.credentials.as_ref().ok_or_else(|| {
            CliError::Config("GOOGLE_APPLICATION_CREDENTIALS is not set".to_string())
        })?;
        debug!("Loading service account key from {}", path.display());
        Ok(ServiceAccountKey::from_file(path)?)
    }

    /// File store client with read-only Drive scope
    pub fn drive_client(&self, key: &ServiceAccountKey) -> Result<DriveClient> {
        let tokens = TokenProvider::new(key.clone(), &[scopes::DRIVE_READONLY]);
        Ok(DriveClient::new(Arc::new(tokens))?)
    }

    /// Spreadsheet client with Sheets and Drive scopes
    pub fn sheets_client(&self, key: &ServiceAccountKey) -> Result<SheetsClient> {
        let tokens = TokenProvider::new(key.clone(), &[scopes::SPREADSHEETS, scopes::DRIVE]);
        Ok(SheetsClient::new(Arc::new(tokens))?)
    }
}

impl GeminiArgs {
    /// Sampling parameters, range-checked
    pub fn generation_settings(&self) -> Result<GenerationSettings> {
        let settings = GenerationSettings {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: self.max_output_tokens,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Prompt templates from the template file
    pub fn prompt_templates(&self) -> Result<PromptTemplates> {
        PromptTemplates::from_file(&self.prompt_template_file).map_err(|e| {
            CliError::Config(format!(
                "Prompt templates {}: {}",
                self.prompt_template_file.display(),
                e
            ))
        })
    }

    /// Analysis gateway built from every Gemini setting
    pub fn provider(&self) -> Result<GeminiProvider> {
        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CliError::Config("GEMINI_API_KEY is not set".to_string()))?;

        let provider = GeminiProvider::new(api_key, self.model.clone(), self.prompt_templates()?)?
            .with_settings(self.generation_settings()?)?;
        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DEFAULT_PROMPT_TEMPLATE_FILE;
    use dresscode_pipeline::PipelineError;
    use std::io::Write;
    use std::path::PathBuf;

    fn google() -> GoogleArgs {
        GoogleArgs {
            credentials: None,
            spreadsheet_id: Some("ss1".to_string()),
            worksheet_name: "回答".to_string(),
            batch: false,
            root_folder_id: None,
            ward_folder_id: Some("ward".to_string()),
        }
    }

    fn gemini(template_file: PathBuf) -> GeminiArgs {
        GeminiArgs {
            api_key: Some("key".to_string()),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.1,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
            prompt_template_file: template_file,
        }
    }

    #[test]
    fn test_pipeline_config_from_args() {
        let config = google().pipeline_config(0).unwrap();
        assert_eq!(config.mode, CollectionMode::Scoped);
        assert_eq!(config.sheet_name, "回答");
        assert_eq!(config.target().unwrap().root_id(), "ward");
    }

    #[test]
    fn test_batch_without_root_is_rejected() {
        let args = GoogleArgs {
            batch: true,
            ..google()
        };
        assert!(matches!(
            args.pipeline_config(0),
            Err(CliError::Pipeline(PipelineError::Collector(_)))
        ));
    }

    #[test]
    fn test_missing_spreadsheet_is_rejected() {
        let args = GoogleArgs {
            spreadsheet_id: None,
            ..google()
        };
        assert!(matches!(
            args.pipeline_config(0),
            Err(CliError::Pipeline(PipelineError::Config(_)))
        ));
    }

    #[test]
    fn test_missing_credentials() {
        assert!(matches!(google().service_account_key(), Err(CliError::Config(_))));

        let args = GoogleArgs {
            credentials: Some(PathBuf::from("/nonexistent/key.json")),
            ..google()
        };
        assert!(matches!(args.service_account_key(), Err(CliError::Auth(_))));
    }

    #[test]
    fn test_generation_settings_out_of_range() {
        let mut args = gemini(PathBuf::from(DEFAULT_PROMPT_TEMPLATE_FILE));
        args.temperature = 5.0;
        assert!(matches!(args.generation_settings(), Err(CliError::Llm(_))));
    }

    #[test]
    fn test_provider_requires_api_key() {
        let mut args = gemini(PathBuf::from(DEFAULT_PROMPT_TEMPLATE_FILE));
        args.api_key = Some("  ".to_string());
        assert!(matches!(args.provider(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_provider_from_template_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "system_prompt = \"You read school rules.\"\nuser_prompt_template = \"Analyze {{file_name}}\""
        )
        .unwrap();

        let provider = gemini(file.path().to_path_buf()).provider().unwrap();
        assert_eq!(provider.settings().top_k, 40);
    }

    #[test]
    fn test_missing_template_file() {
        let args = gemini(PathBuf::from("/nonexistent/templates.toml"));
        assert!(matches!(args.prompt_templates(), Err(CliError::Config(_))));
    }
}
