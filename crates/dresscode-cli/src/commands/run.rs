//! Run command implementation.

use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use dresscode_collector::validate_structure;
use dresscode_pipeline::Pipeline;
use tracing::{info, warn};

/// Execute the run command.
///
/// Settings, credentials, templates and the folder tree are all checked
/// before the first document is downloaded.
pub async fn execute_run(args: RunArgs) -> Result<()> {
    let config = args.google.pipeline_config(args.document_delay_ms)?;
    let target = config.target()?;
    let provider = args.gemini.provider()?;

    let key = args.google.service_account_key()?;
    let drive = args.google.drive_client(&key)?;
    let sheets = args.google.sheets_client(&key)?;

    let structure = validate_structure(&drive, &target).await;
    for warning in &structure.warnings {
        warn!("Drive structure: {}", warning);
    }
    if !structure.valid {
        return Err(CliError::Structure(structure.summary()));
    }
    info!(
        "Drive structure OK: {} subfolders under {}",
        structure.subfolder_count,
        structure.root_name.as_deref().unwrap_or(target.root_id())
    );

    let report = Pipeline::new(drive, provider, sheets, config).run().await?;
    println!("{}", report.summary());

    Ok(())
}
