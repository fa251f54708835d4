//! Validate command implementation.

use crate::cli::ValidateArgs;
use crate::error::{CliError, Result};
use dresscode_collector::validate_structure;
use dresscode_domain::traits::SpreadsheetGateway;

/// Execute the validate command.
pub async fn execute_validate(args: ValidateArgs) -> Result<()> {
    let config = args.google.pipeline_config(0)?;
    let target = config.target()?;

    let key = args.google.service_account_key()?;
    let drive = args.google.drive_client(&key)?;
    let sheets = args.google.sheets_client(&key)?;

    let structure = validate_structure(&drive, &target).await;
    println!("Mode: {}", target.mode());
    println!("{}", structure.summary());

    let sheet = sheets
        .get_sheet(&config.spreadsheet_id, &config.sheet_name)
        .await?;
    match sheet {
        Some(_) => println!("Worksheet '{}': found", config.sheet_name),
        None => {
            return Err(CliError::Config(format!(
                "Worksheet '{}' not found in spreadsheet {}",
                config.sheet_name, config.spreadsheet_id
            )))
        }
    }

    if !structure.valid {
        return Err(CliError::Structure(structure.summary()));
    }
    Ok(())
}
