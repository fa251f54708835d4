//! Parsed analysis results

use crate::SheetsError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which run metadata is attached to a result tree
pub const METADATA_KEY: &str = "_metadata";

/// Provenance attached to one analysis
///
/// Never written to the worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Region (ward) name
    #[serde(rename = "ward")]
    pub region_name: String,

    /// Organization (school) name
    #[serde(rename = "school")]
    pub organization_name: String,

    /// File display name
    pub file_name: String,

    /// File identifier in the store
    pub file_id: String,

    /// `region/organization/file_name`
    #[serde(rename = "file_path")]
    pub storage_path: String,

    /// When the analysis finished (RFC 3339)
    pub analysis_timestamp: String,

    /// Model that produced the analysis
    pub model_used: String,

    /// Run the analysis belongs to
    pub run_id: String,
}

/// One document's analysis, as a nested tree
///
/// The body never contains `_`-prefixed top-level keys; those are reserved
/// for metadata and stripped on construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisResult {
    body: Map<String, Value>,
    metadata: Option<AnalysisMetadata>,
}

impl AnalysisResult {
    /// Build a result from a parsed JSON value
    ///
    /// # Errors
    ///
    /// Returns `SheetsError::InvalidResult` when the value is not a mapping.
    pub fn from_value(value: Value) -> Result<Self, SheetsError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(SheetsError::InvalidResult(format!(
                "expected a JSON object, got {}",
                value_kind(&other)
            ))),
        }
    }

    /// Build a result from a mapping, stripping reserved keys
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        map.retain(|key, _| !key.starts_with('_'));
        Self {
            body: map,
            metadata: None,
        }
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: AnalysisMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The analysis body
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Attached metadata, if any
    pub fn metadata(&self) -> Option<&AnalysisMetadata> {
        self.metadata.as_ref()
    }

    /// Body as a tree for lookups
    pub fn as_tree(&self) -> Value {
        Value::Object(self.body.clone())
    }

    /// Body plus the `_metadata` subtree, for logging and debugging
    pub fn to_annotated_tree(&self) -> Value {
        let mut tree = self.body.clone();
        if let Some(metadata) = &self.metadata {
            if let Ok(value) = serde_json::to_value(metadata) {
                tree.insert(METADATA_KEY.to_string(), value);
            }
        }
        Value::Object(tree)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
