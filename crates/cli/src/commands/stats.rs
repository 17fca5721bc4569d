//! Stats command handler.
//!
//! Shows statistics for the persisted index.

use clap::Args;
use fplscout_core::{config::AppConfig, AppError, AppResult};
use fplscout_knowledge::IndexManager;

/// Show index statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let embedder = super::build_embedder(config)?;
        let mut manager = IndexManager::new(embedder);

        match manager.load(&config.index_dir()) {
            Ok(()) => {}
            Err(AppError::NotFound(_)) => {
                println!(
                    "No index found at {:?}. Run `fplscout index` to build one.",
                    config.index_dir()
                );
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        let stats = manager.stats()?;

        if self.json {
            let output = serde_json::json!({
                "entries": stats.entries,
                "dimensions": stats.dimensions,
                "provider": stats.provider,
                "model": stats.model,
                "builtAt": stats.built_at.to_rfc3339(),
                "location": config.index_dir(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Index location: {:?}", config.index_dir());
            println!("Entries:        {}", stats.entries);
            println!("Dimensions:     {}", stats.dimensions);
            println!("Embedding:      {}/{}", stats.provider, stats.model);
            println!("Built at:       {}", stats.built_at.to_rfc3339());
        }

        Ok(())
    }
}
