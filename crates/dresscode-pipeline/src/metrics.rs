//! Counters for a pipeline run

use crate::error::{DocumentFailure, FailureStage};
use dresscode_sheets::WriteOutcome;
use std::collections::BTreeMap;
use std::time::Duration;

/// Metrics collected during a run
///
/// Download and analysis failures both count as failed analyses; a parse
/// failure does too, since no row can be produced. Only write failures are
/// counted against writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunMetrics {
    /// Organizations whose documents were processed
    pub organizations_processed: usize,

    /// Documents attempted
    pub documents_processed: usize,

    /// Documents whose response parsed into an analysis
    pub analyses_succeeded: usize,

    /// Documents that failed before a row existed
    pub analyses_failed: usize,

    /// Rows appended
    pub writes_succeeded: usize,

    /// Rows the worksheet rejected
    pub writes_failed: usize,

    /// Header rows written
    pub headers_written: usize,

    /// Failures per stage
    pub failures: BTreeMap<FailureStage, usize>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunMetrics {
    /// Create empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one document's outcome into the counters
    pub fn record_document(&mut self, outcome: &Result<WriteOutcome, DocumentFailure>) {
        self.documents_processed += 1;

        match outcome {
            Ok(write) => {
                self.analyses_succeeded += 1;
                self.writes_succeeded += 1;
                if write.header_written {
                    self.headers_written += 1;
                }
            }
            Err(failure) => {
                let stage = failure.stage();
                *self.failures.entry(stage).or_insert(0) += 1;
                if stage == FailureStage::Write {
                    self.analyses_succeeded += 1;
                    self.writes_failed += 1;
                } else {
                    self.analyses_failed += 1;
                }
            }
        }
    }

    /// Record a finished organization
    pub fn record_organization(&mut self) {
        self.organizations_processed += 1;
    }

    /// Total failed documents across all stages
    pub fn total_failures(&self) -> usize {
        self.failures.values().sum()
    }

    /// Successful analyses over processed documents, in percent
    ///
    /// `None` when nothing was processed.
    pub fn success_rate(&self) -> Option<f64> {
        (self.documents_processed > 0)
            .then(|| self.analyses_succeeded as f64 / self.documents_processed as f64 * 100.0)
    }

    /// Generate a summary report of the run
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Run Summary".to_string(),
            "===========".to_string(),
            format!("Elapsed: {:.1} min", self.elapsed.as_secs_f64() / 60.0),
            format!("Organizations processed: {}", self.organizations_processed),
            format!("Documents processed: {}", self.documents_processed),
            format!(
                "Analyses: {} succeeded, {} failed",
                self.analyses_succeeded, self.analyses_failed
            ),
            format!(
                "Writes: {} succeeded, {} failed",
                self.writes_succeeded, self.writes_failed
            ),
        ];

        if let Some(rate) = self.success_rate() {
            lines.push(format!("Success rate: {:.1}%", rate));
        }

        if !self.failures.is_empty() {
            lines.push("Failures by stage:".to_string());
            for (stage, count) in &self.failures {
                lines.push(format!("  {}: {}", stage, count));
            }
        }

        lines.join("\n")
    }
}
