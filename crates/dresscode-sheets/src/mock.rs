//! In-memory spreadsheet for deterministic testing

use crate::SheetsError;
use dresscode_domain::traits::{SpreadsheetGateway, Worksheet};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct SheetState {
    rows: Vec<Vec<String>>,
    failing_markers: Vec<String>,
}

/// Mock worksheet recording appended rows
///
/// Clones share state, so a test can keep one handle while the pipeline
/// writes through another.
#[derive(Debug, Clone)]
pub struct MockWorksheet {
    title: String,
    state: Arc<Mutex<SheetState>>,
}

impl MockWorksheet {
    /// Create an empty worksheet
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            state: Arc::new(Mutex::new(SheetState::default())),
        }
    }

    /// All rows in append order
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().rows.clone()
    }

    /// Seed a row as if it had been written by an earlier run
    pub fn push_existing_row(&self, row: Vec<String>) {
        self.state.lock().unwrap().rows.push(row);
    }

    /// Reject any append whose cells include `marker`
    pub fn fail_when_row_contains(&self, marker: impl Into<String>) {
        self.state.lock().unwrap().failing_markers.push(marker.into());
    }
}

impl Worksheet for MockWorksheet {
    type Error = SheetsError;

    fn title(&self) -> &str {
        &self.title
    }

    async fn is_empty(&self) -> Result<bool, SheetsError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .rows
            .first()
            .and_then(|row| row.first())
            .is_none_or(|cell| cell.is_empty()))
    }

    async fn append_row(&self, values: &[String]) -> Result<(), SheetsError> {
        let mut state = self.state.lock().unwrap();
        if let Some(marker) = state
            .failing_markers
            .iter()
            .find(|marker| values.iter().any(|cell| cell == *marker))
        {
            return Err(SheetsError::Communication(format!(
                "Injected append failure for row containing {}",
                marker
            )));
        }

        state.rows.push(values.to_vec());
        Ok(())
    }
}

/// Mock spreadsheet holding named worksheets
#[derive(Debug, Clone, Default)]
pub struct MockSpreadsheet {
    sheets: Arc<Mutex<HashMap<String, MockWorksheet>>>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MockSpreadsheet {
    /// Create a spreadsheet with no worksheets
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worksheet and return a handle to it
    pub fn add_sheet(&self, title: &str) -> MockWorksheet {
        let sheet = MockWorksheet::new(title);
        self.sheets
            .lock()
            .unwrap()
            .insert(title.to_string(), sheet.clone());
        sheet
    }

    /// Lookups made so far, as `spreadsheet_id/sheet_name`
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl SpreadsheetGateway for MockSpreadsheet {
    type Error = SheetsError;
    type Sheet = MockWorksheet;

    async fn get_sheet(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<Option<MockWorksheet>, SheetsError> {
        self.lookups
            .lock()
            .unwrap()
            .push(format!("{}/{}", spreadsheet_id, sheet_name));

        Ok(self.sheets.lock().unwrap().get(sheet_name).cloned())
    }
}
