//! Row flattening
//!
//! `header()` and `to_row()` walk the same column table; their lengths
//! always agree.

use crate::lookup::{lookup_joined, lookup_text};
use crate::result::AnalysisResult;
use crate::schema::{Column, ColumnKind, COLUMNS, LIST_SEPARATOR};
use serde_json::Value;

/// Header row, one entry per column
pub fn header() -> Vec<String> {
    COLUMNS.iter().map(|c| c.name.to_string()).collect()
}

/// Flatten an analysis result into one row
///
/// Total: missing paths, non-mapping intermediates and null leaves all
/// produce an empty cell.
///
/// # Examples
///
/// ```
/// use dresscode_sheets::{flatten, AnalysisResult};
/// use serde_json::json;
///
/// let result = AnalysisResult::from_value(json!({})).unwrap();
/// let row = flatten::to_row(&result);
/// assert_eq!(row.len(), flatten::header().len());
/// assert!(row.iter().all(String::is_empty));
/// ```
pub fn to_row(result: &AnalysisResult) -> Vec<String> {
    flatten_tree(&result.as_tree())
}

/// Flatten an arbitrary tree into one row
pub fn flatten_tree(tree: &Value) -> Vec<String> {
    COLUMNS.iter().map(|column| cell(tree, column)).collect()
}

fn cell(tree: &Value, column: &Column) -> String {
    match column.kind {
        ColumnKind::Scalar => lookup_text(tree, column.segments(), ""),
        ColumnKind::JoinedList => lookup_joined(tree, column.segments(), LIST_SEPARATOR),
    }
}
