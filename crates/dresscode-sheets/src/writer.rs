//! Header-once worksheet writer

use crate::flatten;
use crate::result::AnalysisResult;
use dresscode_domain::traits::Worksheet;
use tracing::{debug, info};

/// What a write did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOutcome {
    /// True when the header row was written before the data row
    pub header_written: bool,
}

/// Append one result to a worksheet, writing the header first if the sheet
/// is empty
pub async fn write_result<W: Worksheet>(
    sheet: &W,
    result: &AnalysisResult,
) -> Result<WriteOutcome, W::Error> {
    let header_written = ensure_header(sheet).await?;

    let row = flatten::to_row(result);
    sheet.append_row(&row).await?;
    debug!("Appended {} cells to '{}'", row.len(), sheet.title());

    Ok(WriteOutcome { header_written })
}

/// Write the header row if the sheet is empty; true when it was written
pub async fn ensure_header<W: Worksheet>(sheet: &W) -> Result<bool, W::Error> {
    if !sheet.is_empty().await? {
        return Ok(false);
    }

    sheet.append_row(&flatten::header()).await?;
    info!("Wrote header row to '{}'", sheet.title());
    Ok(true)
}
