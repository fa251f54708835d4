//! CLI command definitions and argument parsing.
//!
//! Every setting can come from a flag or from its environment variable.

use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};
use dresscode_llm::gemini::DEFAULT_MODEL;
use dresscode_pipeline::config::{DEFAULT_DOCUMENT_DELAY_MS, DEFAULT_SHEET_NAME};
use std::path::PathBuf;

/// Prompt template file used when none is given
pub const DEFAULT_PROMPT_TEMPLATE_FILE: &str = "prompts/templates.toml";

/// Dresscode - Collect school dress-code documents, analyze them, record the results.
#[derive(Debug, Parser)]
#[command(name = "dresscode")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Collect, analyze and append every document under the configured root
    Run(RunArgs),

    /// Check settings, the folder tree and the target worksheet without analyzing
    Validate(ValidateArgs),

    /// List Gemini models that support content generation
    Models(ModelsArgs),
}

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub google: GoogleArgs,

    #[command(flatten)]
    pub gemini: GeminiArgs,

    /// Pause after each document (milliseconds)
    #[arg(long, env = "DOCUMENT_DELAY_MS", default_value_t = DEFAULT_DOCUMENT_DELAY_MS)]
    pub document_delay_ms: u64,
}

/// Arguments for the validate command.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub google: GoogleArgs,
}

/// Arguments for the models command.
#[derive(Debug, Args)]
pub struct ModelsArgs {
    #[command(flatten)]
    pub gemini: GeminiArgs,
}

/// Drive and Sheets settings.
#[derive(Debug, Clone, Args)]
pub struct GoogleArgs {
    /// Service-account key file
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Target spreadsheet ID
    #[arg(long, env = "SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    /// Target worksheet (tab) name
    #[arg(long, env = "WORKSHEET_NAME", default_value = DEFAULT_SHEET_NAME)]
    pub worksheet_name: String,

    /// Treat the root as a folder of region folders
    #[arg(long, env = "BATCH_MODE", value_parser = BoolishValueParser::new())]
    pub batch: bool,

    /// Root folder ID (batch mode)
    #[arg(long, env = "ROOT_FOLDER_ID")]
    pub root_folder_id: Option<String>,

    /// Region folder ID (scoped mode)
    #[arg(long, env = "WARD_FOLDER_ID")]
    pub ward_folder_id: Option<String>,
}

/// Gemini settings.
#[derive(Debug, Clone, Args)]
pub struct GeminiArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Sampling temperature (0.0-2.0)
    #[arg(long, env = "GEMINI_TEMPERATURE", default_value_t = 0.1)]
    pub temperature: f32,

    /// Nucleus sampling cutoff (0.0-1.0)
    #[arg(long, env = "GEMINI_TOP_P", default_value_t = 0.95)]
    pub top_p: f32,

    /// Top-k sampling cutoff
    #[arg(long, env = "GEMINI_TOP_K", default_value_t = 40)]
    pub top_k: u32,

    /// Upper bound on generated tokens
    #[arg(long, env = "GEMINI_MAX_OUTPUT_TOKENS", default_value_t = 8192)]
    pub max_output_tokens: u32,

    /// Prompt template file (TOML)
    #[arg(long, env = "PROMPT_TEMPLATE_FILE", default_value = DEFAULT_PROMPT_TEMPLATE_FILE)]
    pub prompt_template_file: PathBuf,
}
