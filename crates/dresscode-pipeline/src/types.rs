//! Run results

use crate::metrics::RunMetrics;
use crate::pipeline::run_started_at;
use chrono::{DateTime, Utc};
use dresscode_collector::{CollectionMode, CollectionSummary, SkippedNode};
use dresscode_domain::RunId;
use dresscode_sheets::AnalysisMetadata;

/// Outcome of a completed run
///
/// Partial failure is reported here, not as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Identifier stamped on every analysis of the run
    pub run_id: RunId,

    /// Year token from the folder tree, or the unknown sentinel
    pub year: String,

    /// Collection mode
    pub mode: CollectionMode,

    /// What collection found before processing started
    pub collected: CollectionSummary,

    /// Counters
    pub metrics: RunMetrics,

    /// Provenance of every analysis that produced JSON, in processing order
    pub analyses: Vec<AnalysisMetadata>,

    /// Subtrees skipped during collection
    pub skipped: Vec<SkippedNode>,
}

impl RunReport {
    /// When the run started
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        run_started_at(self.run_id)
    }

    /// Multi-line summary for the end of a run
    pub fn summary(&self) -> String {
        let started = self
            .started_at()
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string());
        let mut lines = vec![
            format!("Run {} ({} mode, year {})", self.run_id, self.mode, self.year),
            format!("Started: {}", started),
            format!(
                "Collected: {} documents in {} organizations",
                self.collected.document_count, self.collected.organization_count
            ),
            self.metrics.summary(),
        ];
        if !self.skipped.is_empty() {
            lines.push(format!("Skipped during collection: {}", self.skipped.len()));
            for node in &self.skipped {
                lines.push(format!("  {} '{}': {}", node.scope, node.name, node.reason));
            }
        }
        lines.join("\n")
    }
}
