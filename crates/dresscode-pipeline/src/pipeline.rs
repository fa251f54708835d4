//! Run orchestration

use crate::config::PipelineConfig;
use crate::error::{DocumentFailure, PipelineError};
use crate::metrics::RunMetrics;
use crate::pacer::TokioPacer;
use crate::parser::extract_json;
use crate::types::RunReport;
use chrono::{DateTime, Utc};
use dresscode_collector::{summarize, FolderCollector};
use dresscode_domain::traits::{DocumentAnalyzer, FileStore, Pacer, SpreadsheetGateway, Worksheet};
use dresscode_domain::{group_by_organization, DocumentRecord, RunId};
use dresscode_sheets::{writer, AnalysisMetadata, AnalysisResult, WriteOutcome};
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Characters of an unparsable response kept in the log
const RESPONSE_EXCERPT_CHARS: usize = 500;

/// Drives collect → download → analyze → extract → write for one run
///
/// Every gateway call is awaited before the next one starts.
///
/// # Examples
///
/// ```
/// use dresscode_drive::MockFileStore;
/// use dresscode_llm::MockAnalyzer;
/// use dresscode_pipeline::{Pipeline, PipelineConfig, RecordingPacer};
/// use dresscode_sheets::MockSpreadsheet;
///
/// # async fn example() {
/// let mut store = MockFileStore::new();
/// store.add_root("ward", "渋谷区");
/// store.add_folder("ward", "s1", "XX中学校");
/// store.add_pdf("s1", "f1", "校則.pdf", b"%PDF");
///
/// let spreadsheet = MockSpreadsheet::new();
/// let sheet = spreadsheet.add_sheet("シート1");
///
/// let config = PipelineConfig {
///     ward_folder_id: Some("ward".to_string()),
///     spreadsheet_id: "ss1".to_string(),
///     ..PipelineConfig::default()
/// };
///
/// let pipeline = Pipeline::new(store, MockAnalyzer::new("{}"), spreadsheet, config)
///     .with_pacer(RecordingPacer::new());
/// let report = pipeline.run().await.unwrap();
///
/// assert_eq!(report.metrics.writes_succeeded, 1);
/// assert_eq!(sheet.rows().len(), 2);
/// # }
/// ```
pub struct Pipeline<F, A, G, P = TokioPacer> {
    config: PipelineConfig,
    store: F,
    analyzer: A,
    spreadsheet: G,
    pacer: P,
    run_id: RunId,
}

impl<F, A, G> Pipeline<F, A, G, TokioPacer> {
    /// Create a pipeline that sleeps between documents
    pub fn new(store: F, analyzer: A, spreadsheet: G, config: PipelineConfig) -> Self {
        Self {
            config,
            store,
            analyzer,
            spreadsheet,
            pacer: TokioPacer,
            run_id: RunId::new(),
        }
    }
}

impl<F, A, G, P> Pipeline<F, A, G, P> {
    /// Replace the pacer
    pub fn with_pacer<Q>(self, pacer: Q) -> Pipeline<F, A, G, Q> {
        Pipeline {
            config: self.config,
            store: self.store,
            analyzer: self.analyzer,
            spreadsheet: self.spreadsheet,
            pacer,
            run_id: self.run_id,
        }
    }

    /// Use a specific run identifier
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    /// Identifier of this run
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Run configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

impl<F, A, G, P> Pipeline<F, A, G, P>
where
    F: FileStore,
    F::Error: Display,
    A: DocumentAnalyzer,
    A::Error: Display,
    G: SpreadsheetGateway,
    G::Error: Display,
    <G::Sheet as Worksheet>::Error: Display,
    P: Pacer,
{
    /// Execute one run
    ///
    /// # Errors
    ///
    /// Configuration problems, an unusable target worksheet and a failed
    /// analyzer connection test are errors, all raised before any document is
    /// collected. Every other failure is counted in the returned report.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let started = Instant::now();

        self.config.validate()?;
        let target = self.config.target()?;
        let started_at = run_started_at(self.run_id)
            .map(|at| at.to_rfc3339())
            .unwrap_or_default();
        info!("Starting run {} {} ({} mode)", self.run_id, started_at, target.mode());

        let sheet = self.open_sheet().await?;
        self.analyzer
            .test_connection()
            .await
            .map_err(|e| PipelineError::Analyzer(e.to_string()))?;
        info!("Analyzer ready: {}", self.analyzer.model_name());

        let collection = FolderCollector::new(&self.store).collect(&target).await;
        let year = collection.year.clone();
        let skipped = collection.skipped.clone();
        let collected = summarize(collection.records(), collection.mode);
        info!(
            "Collected {} documents from {} organizations ({} mode)",
            collected.document_count, collected.organization_count, collected.mode
        );
        let mut metrics = RunMetrics::new();
        let mut analyses = Vec::new();

        if collection.is_empty() {
            warn!("No documents collected; nothing to analyze");
        } else {
            let total = collection.len();
            let groups = group_by_organization(collection.into_records());
            info!("Processing {} documents in {} organizations", total, groups.len());

            for (index, group) in groups.iter().enumerate() {
                info!(
                    "Organization {}/{}: {}/{}",
                    index + 1,
                    groups.len(),
                    group.region_name,
                    group.organization_name
                );

                let mut analyzed = 0;
                let mut written = 0;
                for record in &group.documents {
                    let outcome = self.process_document(&sheet, record, &mut analyses).await;
                    match &outcome {
                        Ok(_) => {
                            analyzed += 1;
                            written += 1;
                        }
                        Err(failure) => {
                            error!("{}: {}", record.storage_path, failure);
                            if matches!(failure, DocumentFailure::Write(_)) {
                                analyzed += 1;
                            }
                        }
                    }
                    metrics.record_document(&outcome);

                    if metrics.documents_processed % self.config.progress_interval == 0 {
                        info!("Progress: {}/{} documents", metrics.documents_processed, total);
                    }

                    self.pacer.pause(self.config.document_delay()).await;
                }

                metrics.record_organization();
                info!(
                    "Finished {}/{}: analyses {}/{}, writes {}/{}",
                    group.region_name,
                    group.organization_name,
                    analyzed,
                    group.len(),
                    written,
                    analyzed
                );
            }
        }

        metrics.elapsed = started.elapsed();
        let report = RunReport {
            run_id: self.run_id,
            year,
            mode: target.mode(),
            collected,
            metrics,
            analyses,
            skipped,
        };
        for line in report.metrics.summary().lines() {
            info!("{}", line);
        }

        Ok(report)
    }

    async fn open_sheet(&self) -> Result<G::Sheet, PipelineError> {
        let spreadsheet_id = &self.config.spreadsheet_id;
        let sheet_name = &self.config.sheet_name;

        match self.spreadsheet.get_sheet(spreadsheet_id, sheet_name).await {
            Ok(Some(sheet)) => {
                debug!("Opened worksheet '{}'", sheet.title());
                Ok(sheet)
            }
            Ok(None) => Err(PipelineError::Config(format!(
                "Worksheet '{}' not found in spreadsheet {}",
                sheet_name, spreadsheet_id
            ))),
            Err(e) => Err(PipelineError::Spreadsheet(e.to_string())),
        }
    }

    /// One document end to end; every failure comes back as a value
    ///
    /// Provenance of every parsed analysis is pushed to `analyses`, whether
    /// or not the row is written.
    async fn process_document(
        &self,
        sheet: &G::Sheet,
        record: &DocumentRecord,
        analyses: &mut Vec<AnalysisMetadata>,
    ) -> Result<WriteOutcome, DocumentFailure> {
        info!("Analyzing {} ({:.2} MB)", record.storage_path, record.size_in_megabytes);

        let bytes = self
            .store
            .download(&record.file_id)
            .await
            .map_err(|e| DocumentFailure::Download(e.to_string()))?;
        debug!("Downloaded {} bytes for {}", bytes.len(), record.file_name);

        let response = self
            .analyzer
            .analyze(&bytes, &record.file_name)
            .await
            .map_err(|e| DocumentFailure::Analysis(e.to_string()))?;
        debug!("Response for {}: {} chars", record.file_name, response.chars().count());

        let body = extract_json(&response).inspect_err(|_| {
            let excerpt: String = response.chars().take(RESPONSE_EXCERPT_CHARS).collect();
            warn!("Unparsable response for {}: {}", record.file_name, excerpt);
        })?;

        let metadata = self.metadata_for(record);
        let result = AnalysisResult::from_map(body).with_metadata(metadata.clone());
        debug!(result = %result.to_annotated_tree(), "Parsed analysis for {}", record.storage_path);
        analyses.push(metadata);

        writer::write_result(sheet, &result)
            .await
            .map_err(|e| DocumentFailure::Write(e.to_string()))
    }

    fn metadata_for(&self, record: &DocumentRecord) -> AnalysisMetadata {
        AnalysisMetadata {
            region_name: record.region_name.clone(),
            organization_name: record.organization_name.clone(),
            file_name: record.file_name.clone(),
            file_id: record.file_id.clone(),
            storage_path: record.storage_path.clone(),
            analysis_timestamp: Utc::now().to_rfc3339(),
            model_used: self.analyzer.model_name().to_string(),
            run_id: self.run_id.to_string(),
        }
    }
}

/// Wall-clock start of a run, read from its identifier
pub fn run_started_at(run_id: RunId) -> Option<DateTime<Utc>> {
    i64::try_from(run_id.timestamp())
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}
