//! Index command handler.
//!
//! Chunks the collected documents, embeds every chunk, and persists the
//! resulting vector index as one snapshot.

use clap::Args;
use fplscout_core::{config::AppConfig, AppError, AppResult};
use fplscout_feed::load_documents;
use fplscout_knowledge::IndexManager;

/// Chunk, embed, and persist the vector index
#[derive(Args, Debug)]
pub struct IndexCommand {
    /// Re-fetch the feed even if collected documents exist
    #[arg(long)]
    pub refresh: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IndexCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing index command");

        let documents = if self.refresh {
            super::collect_documents(config).await?
        } else {
            match load_documents(&config.documents_path()) {
                Ok(documents) => documents,
                Err(AppError::NotFound(_)) => {
                    tracing::info!("No collected documents found; fetching the feed first");
                    super::collect_documents(config).await?
                }
                Err(e) => return Err(e),
            }
        };

        let embedder = super::build_embedder(config)?;
        let mut manager = IndexManager::new(embedder);

        let stats = super::build_and_persist_index(config, &mut manager, &documents).await?;

        if self.json {
            let output = serde_json::json!({
                "documents": documents.len(),
                "indexed": stats.indexed,
                "skipped": stats.skipped,
                "location": config.index_dir(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!(
                "Indexed {} chunks from {} documents ({} excluded) into {:?}",
                stats.indexed,
                documents.len(),
                stats.skipped,
                config.index_dir()
            );
        }

        Ok(())
    }
}
