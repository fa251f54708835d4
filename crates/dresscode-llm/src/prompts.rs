//! Prompt template store
//!
//! Templates live in a TOML file with two keys:
//!
//! ```toml
//! system_prompt = "You extract dress-code regulations as JSON."
//! user_prompt_template = "Analyze {file_name} and answer with the JSON schema."
//! ```
//!
//! The user template has one substitution point, `{file_name}`.

use crate::LlmError;
use serde::Deserialize;
use std::path::Path;

/// Placeholder replaced with the document display name
pub const FILE_NAME_PLACEHOLDER: &str = "{file_name}";

/// Raw template file contents; keys are optional so that missing ones can be
/// reported by name
#[derive(Debug, Deserialize)]
struct TemplateFile {
    system_prompt: Option<String>,
    user_prompt_template: Option<String>,
}

/// System prompt plus user prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    system_prompt: String,
    user_prompt_template: String,
}

impl PromptTemplates {
    /// Build templates directly
    pub fn new(
        system_prompt: impl Into<String>,
        user_prompt_template: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let templates = Self {
            system_prompt: system_prompt.into(),
            user_prompt_template: user_prompt_template.into(),
        };
        templates.validate()?;
        Ok(templates)
    }

    /// Load templates from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LlmError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LlmError::Config(format!("Failed to read template file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse templates from TOML text
    pub fn from_toml(toml_str: &str) -> Result<Self, LlmError> {
        let file: TemplateFile = toml::from_str(toml_str)
            .map_err(|e| LlmError::Config(format!("Failed to parse template TOML: {}", e)))?;

        let system_prompt = file
            .system_prompt
            .ok_or_else(|| LlmError::Config("Missing template key: system_prompt".to_string()))?;
        let user_prompt_template = file.user_prompt_template.ok_or_else(|| {
            LlmError::Config("Missing template key: user_prompt_template".to_string())
        })?;

        Self::new(system_prompt, user_prompt_template)
    }

    fn validate(&self) -> Result<(), LlmError> {
        if self.system_prompt.trim().is_empty() {
            return Err(LlmError::Config("system_prompt is empty".to_string()));
        }
        if self.user_prompt_template.trim().is_empty() {
            return Err(LlmError::Config("user_prompt_template is empty".to_string()));
        }
        Ok(())
    }

    /// The system prompt
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Render the user prompt for one document
    pub fn render_user_prompt(&self, file_name: &str) -> String {
        self.user_prompt_template
            .replace(FILE_NAME_PLACEHOLDER, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TEMPLATES: &str = r#"
system_prompt = "あなたは校則の分析者です。"
user_prompt_template = "ファイル {file_name} を分析し、JSONで回答してください。"
"#;

    #[test]
    fn test_parse_templates() {
        let templates = PromptTemplates::from_toml(TEMPLATES).unwrap();
        assert_eq!(templates.system_prompt(), "あなたは校則の分析者です。");
        assert_eq!(
            templates.render_user_prompt("校則.pdf"),
            "ファイル 校則.pdf を分析し、JSONで回答してください。"
        );
    }

    #[test]
    fn test_template_without_placeholder() {
        let templates = PromptTemplates::new("sys", "no placeholder").unwrap();
        assert_eq!(templates.render_user_prompt("x.pdf"), "no placeholder");
    }

    #[test]
    fn test_missing_keys_are_config_errors() {
        let err = PromptTemplates::from_toml(r#"system_prompt = "only""#).unwrap_err();
        assert!(matches!(err, LlmError::Config(ref m) if m.contains("user_prompt_template")));

        let err = PromptTemplates::from_toml(r#"user_prompt_template = "only""#).unwrap_err();
        assert!(matches!(err, LlmError::Config(ref m) if m.contains("system_prompt")));
    }

    #[test]
    fn test_empty_values_rejected() {
        assert!(PromptTemplates::new("  ", "user").is_err());
        assert!(PromptTemplates::new("system", "").is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            PromptTemplates::from_toml("system_prompt = "),
            Err(LlmError::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TEMPLATES.as_bytes()).unwrap();

        let templates = PromptTemplates::from_file(file.path()).unwrap();
        assert!(templates.render_user_prompt("a.pdf").contains("a.pdf"));
    }

    #[test]
    fn test_missing_file() {
        let result = PromptTemplates::from_file("/nonexistent/prompts.toml");
        assert!(matches!(result, Err(LlmError::Config(_))));
    }
}
