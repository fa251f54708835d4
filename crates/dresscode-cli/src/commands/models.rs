//! Models command implementation.

use crate::cli::ModelsArgs;
use crate::error::Result;

/// Execute the models command.
pub async fn execute_models(args: ModelsArgs) -> Result<()> {
    let provider = args.gemini.provider()?;
    let models = provider.list_models().await?;

    if models.is_empty() {
        println!("No models support generateContent");
        return Ok(());
    }

    println!("Models supporting generateContent ({}):", models.len());
    for model in &models {
        if model.display_name.is_empty() {
            println!("  {}", model.name);
        } else {
            println!("  {} ({})", model.name, model.display_name);
        }
    }

    let configured = format!("models/{}", args.gemini.model.trim_start_matches("models/"));
    if !models.iter().any(|m| m.name == configured) {
        println!("Configured model {} is not in this list", configured);
    }

    Ok(())
}
