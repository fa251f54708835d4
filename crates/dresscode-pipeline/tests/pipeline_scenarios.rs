//! End-to-end runs over in-memory gateways

use dresscode_collector::{CollectionMode, SkipScope};
use dresscode_domain::RunId;
use dresscode_drive::MockFileStore;
use dresscode_llm::MockAnalyzer;
use dresscode_pipeline::{FailureStage, Pipeline, PipelineConfig, PipelineError, RecordingPacer};
use dresscode_sheets::{flatten, MockSpreadsheet};
use chrono::{DateTime, Utc};
use std::time::Duration;

const SHEET: &str = "回答";

const RESPONSE: &str = r#"以下が分析結果です。
```json
{
  "general": { "revision_process": { "status": "あり", "evidence": "第3条" } },
  "_metadata": { "ward": "should be replaced" }
}
```"#;

fn config(ward: &str) -> PipelineConfig {
    PipelineConfig {
        ward_folder_id: Some(ward.to_string()),
        spreadsheet_id: "ss1".to_string(),
        sheet_name: SHEET.to_string(),
        document_delay_ms: 250,
        ..PipelineConfig::default()
    }
}

fn column(name: &str) -> usize {
    flatten::header().iter().position(|h| h == name).unwrap()
}

/// One region, one organization, two PDFs and a non-PDF sibling
fn single_school() -> MockFileStore {
    let mut store = MockFileStore::new();
    store.add_root("ward", "渋谷区");
    store.add_folder("ward", "s1", "XX中学校");
    store.add_pdf("s1", "f1", "2025_校則.pdf", b"%PDF rules");
    store.add_pdf("s1", "f2", "random.pdf", b"%PDF other");
    store.add_file("s1", "f3", "memo.txt", "text/plain", b"memo");
    store
}

#[tokio::test]
async fn test_first_run_writes_header_and_rows() {
    let spreadsheet = MockSpreadsheet::new();
    let sheet = spreadsheet.add_sheet(SHEET);
    let analyzer = MockAnalyzer::new(RESPONSE);

    let pipeline = Pipeline::new(single_school(), analyzer.clone(), spreadsheet, config("ward"))
        .with_pacer(RecordingPacer::new());
    let report = pipeline.run().await.unwrap();

    assert_eq!(report.mode, CollectionMode::Scoped);
    assert_eq!(report.metrics.organizations_processed, 1);
    assert_eq!(report.metrics.documents_processed, 2);
    assert_eq!(report.metrics.writes_succeeded, 2);
    assert_eq!(report.metrics.headers_written, 1);
    assert_eq!(analyzer.analyzed(), vec!["2025_校則.pdf", "random.pdf"]);
    assert_eq!(analyzer.connection_tests(), 1);
    assert_eq!(report.collected.document_count, 2);
    assert_eq!(report.collected.organization_count, 1);
    assert!(report.summary().contains("Collected: 2 documents in 1 organizations"));

    let rows = sheet.rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], flatten::header());
    assert_eq!(rows[1].len(), rows[0].len());
    assert_eq!(rows[1][column("見直しプロセス_規定")], "あり");
    assert_eq!(rows[2][column("見直しプロセス_根拠")], "第3条");
}

#[tokio::test]
async fn test_report_carries_analysis_provenance() {
    let spreadsheet = MockSpreadsheet::new();
    spreadsheet.add_sheet(SHEET);
    let run_id = RunId::new();

    let pipeline = Pipeline::new(single_school(), MockAnalyzer::new(RESPONSE), spreadsheet, config("ward"))
        .with_pacer(RecordingPacer::new())
        .with_run_id(run_id);
    let report = pipeline.run().await.unwrap();

    let started = report.started_at().unwrap();
    assert!((Utc::now() - started).num_seconds().abs() < 60);

    assert_eq!(report.analyses.len(), 2);
    let first = &report.analyses[0];
    assert_eq!(first.region_name, "渋谷区");
    assert_eq!(first.organization_name, "XX中学校");
    assert_eq!(first.storage_path, "渋谷区/XX中学校/2025_校則.pdf");
    assert_eq!(first.file_id, "f1");
    assert_eq!(first.model_used, "mock-model");
    assert_eq!(first.run_id, run_id.to_string());

    let analyzed_at = DateTime::parse_from_rfc3339(&first.analysis_timestamp).unwrap();
    assert!(analyzed_at.with_timezone(&Utc) >= started - chrono::Duration::seconds(1));
}

#[tokio::test]
async fn test_failed_connection_test_stops_before_collection() {
    let store = single_school();
    let spreadsheet = MockSpreadsheet::new();
    let sheet = spreadsheet.add_sheet(SHEET);
    let mut analyzer = MockAnalyzer::new(RESPONSE);
    analyzer.fail_connection();

    let pipeline = Pipeline::new(store.clone(), analyzer.clone(), spreadsheet, config("ward"))
        .with_pacer(RecordingPacer::new());
    let result = pipeline.run().await;

    assert!(matches!(result, Err(PipelineError::Analyzer(ref m)) if m.contains("mock-model")));
    assert_eq!(analyzer.connection_tests(), 1);
    assert_eq!(analyzer.call_count(), 0);
    assert!(store.calls().is_empty());
    assert!(sheet.rows().is_empty());
}

#[tokio::test]
async fn test_second_run_adds_no_header() {
    let spreadsheet = MockSpreadsheet::new();
    let sheet = spreadsheet.add_sheet(SHEET);

    for _ in 0..2 {
        let pipeline = Pipeline::new(
            single_school(),
            MockAnalyzer::new(RESPONSE),
            spreadsheet.clone(),
            config("ward"),
        )
        .with_pacer(RecordingPacer::new());
        pipeline.run().await.unwrap();
    }

    let rows = sheet.rows();
    assert_eq!(rows.len(), 5);
    let headers = rows.iter().filter(|row| **row == flatten::header()).count();
    assert_eq!(headers, 1);
}

#[tokio::test]
async fn test_document_failures_are_isolated() {
    let mut store = MockFileStore::new();
    store.add_root("ward", "港区");
    store.add_folder("ward", "s1", "A中学校");
    store.add_pdf("s1", "d1", "校則_download.pdf", b"%PDF");
    store.add_pdf("s1", "d2", "校則_analysis.pdf", b"%PDF");
    store.add_pdf("s1", "d3", "校則_parse.pdf", b"%PDF");
    store.add_folder("ward", "s2", "B中学校");
    store.add_pdf("s2", "d4", "校則_write.pdf", b"%PDF");
    store.add_pdf("s2", "d5", "校則_ok.pdf", b"%PDF");
    store.fail_download("d1");

    let mut analyzer = MockAnalyzer::new(RESPONSE);
    analyzer.add_error("校則_analysis.pdf");
    analyzer.add_response("校則_parse.pdf", "申し訳ありませんが分析できませんでした。");

    let spreadsheet = MockSpreadsheet::new();
    let sheet = spreadsheet.add_sheet(SHEET);
    sheet.push_existing_row(flatten::header());
    // only the d4 row carries the marker
    let write_marker_response = RESPONSE.replace("第3条", "WRITE-FAIL");
    analyzer.add_response("校則_write.pdf", write_marker_response);
    sheet.fail_when_row_contains("WRITE-FAIL");

    let pacer = RecordingPacer::new();
    let pipeline = Pipeline::new(store, analyzer.clone(), spreadsheet, config("ward"))
        .with_pacer(pacer.clone());
    let report = pipeline.run().await.unwrap();

    let metrics = &report.metrics;
    assert_eq!(metrics.organizations_processed, 2);
    assert_eq!(metrics.documents_processed, 5);
    assert_eq!(metrics.analyses_succeeded, 2);
    assert_eq!(metrics.analyses_failed, 3);
    assert_eq!(metrics.writes_succeeded, 1);
    assert_eq!(metrics.writes_failed, 1);
    assert_eq!(metrics.headers_written, 0);
    for stage in [
        FailureStage::Download,
        FailureStage::Analysis,
        FailureStage::Parse,
        FailureStage::Write,
    ] {
        assert_eq!(metrics.failures[&stage], 1, "stage {}", stage);
    }
    assert_eq!(metrics.success_rate(), Some(40.0));

    // parsed analyses keep their provenance even when the row is rejected
    let names: Vec<_> = report.analyses.iter().map(|m| m.file_name.as_str()).collect();
    assert_eq!(names, vec!["校則_write.pdf", "校則_ok.pdf"]);

    // the download failure never reaches the analyzer
    assert_eq!(analyzer.call_count(), 4);
    assert_eq!(sheet.rows().len(), 2);
    assert_eq!(pacer.delays(), vec![Duration::from_millis(250); 5]);
}

#[tokio::test]
async fn test_missing_sheet_fails_before_collection() {
    let store = single_school();
    let spreadsheet = MockSpreadsheet::new();
    spreadsheet.add_sheet("別のシート");

    let pipeline = Pipeline::new(store.clone(), MockAnalyzer::default(), spreadsheet, config("ward"))
        .with_pacer(RecordingPacer::new());
    let result = pipeline.run().await;

    assert!(matches!(result, Err(PipelineError::Config(_))));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_missing_root_fails_before_any_io() {
    let store = single_school();
    let spreadsheet = MockSpreadsheet::new();
    spreadsheet.add_sheet(SHEET);

    let config = PipelineConfig {
        mode: CollectionMode::Batch,
        ..config("ward")
    };
    let pipeline = Pipeline::new(store.clone(), MockAnalyzer::default(), spreadsheet.clone(), config)
        .with_pacer(RecordingPacer::new());

    assert!(matches!(pipeline.run().await, Err(PipelineError::Collector(_))));
    assert!(store.calls().is_empty());
    assert!(spreadsheet.lookups().is_empty());
}

#[tokio::test]
async fn test_empty_collection_is_a_zero_report() {
    let mut store = MockFileStore::new();
    store.add_root("ward", "港区");
    let spreadsheet = MockSpreadsheet::new();
    let sheet = spreadsheet.add_sheet(SHEET);
    let pacer = RecordingPacer::new();

    let pipeline = Pipeline::new(store, MockAnalyzer::default(), spreadsheet, config("ward"))
        .with_pacer(pacer.clone());
    let report = pipeline.run().await.unwrap();

    assert_eq!(report.metrics.documents_processed, 0);
    assert_eq!(report.collected.document_count, 0);
    assert!(report.analyses.is_empty());
    assert_eq!(report.metrics.success_rate(), None);
    assert!(sheet.rows().is_empty());
    assert!(pacer.delays().is_empty());
}

#[tokio::test]
async fn test_skipped_subtrees_reach_the_report() {
    let mut store = single_school();
    store.add_folder("ward", "s2", "YY中学校");
    store.fail_listing("s2");
    let spreadsheet = MockSpreadsheet::new();
    spreadsheet.add_sheet(SHEET);

    let run_id = RunId::new();
    let pipeline = Pipeline::new(store, MockAnalyzer::new(RESPONSE), spreadsheet, config("ward"))
        .with_pacer(RecordingPacer::new())
        .with_run_id(run_id);
    let report = pipeline.run().await.unwrap();

    assert_eq!(report.run_id, run_id);
    assert_eq!(report.metrics.writes_succeeded, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].scope, SkipScope::Organization);
    assert!(report.summary().contains("organization 'YY中学校'"));
}

#[tokio::test]
async fn test_batch_mode_reports_year() {
    let mut store = MockFileStore::new();
    store.add_root("root", "2025_校則データ");
    store.add_folder("root", "w1", "世田谷区");
    store.add_folder("w1", "s1", "Z中学校");
    store.add_pdf("s1", "f1", "生徒心得.pdf", b"%PDF");
    let spreadsheet = MockSpreadsheet::new();
    spreadsheet.add_sheet(SHEET);

    let config = PipelineConfig {
        mode: CollectionMode::Batch,
        root_folder_id: Some("root".to_string()),
        ..config("unused")
    };
    let pipeline = Pipeline::new(store, MockAnalyzer::new(RESPONSE), spreadsheet, config)
        .with_pacer(RecordingPacer::new());
    let report = pipeline.run().await.unwrap();

    assert_eq!(report.year, "2025");
    assert_eq!(report.mode, CollectionMode::Batch);
    assert_eq!(report.metrics.writes_succeeded, 1);
}
