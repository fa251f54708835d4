//! Configuration for a pipeline run

use crate::error::PipelineError;
use dresscode_collector::{CollectionMode, CollectionTarget};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Worksheet written to when none is configured
pub const DEFAULT_SHEET_NAME: &str = "シート1";

/// Pause after each document (milliseconds)
pub const DEFAULT_DOCUMENT_DELAY_MS: u64 = 1000;

/// Documents between progress lines
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10;

/// Settings for one run, built once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// How the root folder is interpreted
    pub mode: CollectionMode,

    /// Folder holding region folders (batch mode)
    pub root_folder_id: Option<String>,

    /// Single region folder (scoped mode)
    pub ward_folder_id: Option<String>,

    /// Target spreadsheet
    pub spreadsheet_id: String,

    /// Target worksheet tab
    pub sheet_name: String,

    /// Pause after each document (milliseconds)
    pub document_delay_ms: u64,

    /// Log a progress line every this many documents
    pub progress_interval: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: CollectionMode::default(),
            root_folder_id: None,
            ward_folder_id: None,
            spreadsheet_id: String::new(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            document_delay_ms: DEFAULT_DOCUMENT_DELAY_MS,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl PipelineConfig {
    /// Parse from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, PipelineError> {
        toml::from_str(toml_str)
            .map_err(|e| PipelineError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// The collection target for the active mode
    ///
    /// Batch mode reads `root_folder_id`, scoped mode `ward_folder_id`.
    pub fn target(&self) -> Result<CollectionTarget, PipelineError> {
        let root_id = match self.mode {
            CollectionMode::Batch => self.root_folder_id.clone(),
            CollectionMode::Scoped => self.ward_folder_id.clone(),
        };
        Ok(CollectionTarget::new(self.mode, root_id)?)
    }

    /// Pause applied after each document
    pub fn document_delay(&self) -> Duration {
        Duration::from_millis(self.document_delay_ms)
    }

    /// Check every required field for the active mode
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(PipelineError::Config("spreadsheet_id is required".to_string()));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(PipelineError::Config("sheet_name must not be empty".to_string()));
        }
        if self.progress_interval == 0 {
            return Err(PipelineError::Config(
                "progress_interval must be greater than 0".to_string(),
            ));
        }
        self.target()?;
        Ok(())
    }
}
