//! Collect command handler.
//!
//! Fetches the FPL feed and writes the derived documents to the data
//! directory.

use clap::Args;
use fplscout_core::{config::AppConfig, AppResult};

/// Fetch the FPL feed and build text documents
#[derive(Args, Debug)]
pub struct CollectCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CollectCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing collect command");

        let documents = super::collect_documents(config).await?;

        if self.json {
            let output = serde_json::json!({
                "documents": documents.len(),
                "path": config.documents_path(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!(
                "Collected {} documents into {:?}",
                documents.len(),
                config.documents_path()
            );
        }

        Ok(())
    }
}
