//! Command handlers for the fplscout CLI.
//!
//! This module organizes all CLI commands into separate submodules and
//! hosts the helpers shared between them.

pub mod ask;
pub mod chat;
pub mod collect;
pub mod index;
pub mod stats;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use collect::CollectCommand;
pub use index::IndexCommand;
pub use stats::StatsCommand;

use fplscout_core::{config::AppConfig, AppError, AppResult};
use fplscout_feed::{build_documents, load_documents, save_documents, FeedClient};
use fplscout_knowledge::chunker::chunk_documents;
use fplscout_knowledge::embeddings::{create_provider, EmbeddingProvider, EmbeddingSettings};
use fplscout_knowledge::{BuildStats, Document, IndexManager};
use fplscout_llm::LlmClient;
use std::sync::Arc;

/// Construct the embedding provider from configuration.
pub fn build_embedder(config: &AppConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    let settings = EmbeddingSettings {
        provider: config.embedding_provider.clone(),
        model: config.embedding_model.clone(),
        dimensions: config.embedding_dimensions,
        endpoint: config.resolve_endpoint(&config.embedding_provider),
    };

    let api_key = config.resolve_api_key(&config.embedding_provider);
    create_provider(&settings, api_key.as_deref())
}

/// Construct the completion client from configuration.
pub fn build_llm_client(config: &AppConfig) -> AppResult<Arc<dyn LlmClient>> {
    let endpoint = config.resolve_endpoint(&config.provider);
    let api_key = config.resolve_api_key(&config.provider);

    fplscout_llm::create_client(&config.provider, endpoint.as_deref(), api_key.as_deref())
        .map_err(AppError::Config)
}

/// Fetch the feed, build documents, and save them to the data directory.
pub async fn collect_documents(config: &AppConfig) -> AppResult<Vec<Document>> {
    let client = FeedClient::new(&config.feed_base_url)?;
    let snapshot = client.collect().await?;
    let documents = build_documents(&snapshot.records, &snapshot.histories);
    save_documents(&config.documents_path(), &documents)?;
    Ok(documents)
}

/// Chunk documents, build the index, and persist it.
pub async fn build_and_persist_index(
    config: &AppConfig,
    manager: &mut IndexManager,
    documents: &[Document],
) -> AppResult<BuildStats> {
    let chunks = chunk_documents(documents, config.chunk_size, config.chunk_overlap)?;
    let stats = manager.build(chunks).await?;
    manager.persist(&config.index_dir())?;
    Ok(stats)
}

/// Make sure the manager holds an index, loading the persisted snapshot or
/// falling back to the full collect -> build -> persist path when none
/// exists.
pub async fn ensure_index(config: &AppConfig, manager: &mut IndexManager) -> AppResult<()> {
    match manager.load(&config.index_dir()) {
        Ok(()) => Ok(()),
        Err(AppError::NotFound(reason)) => {
            tracing::info!("{}; building a fresh index", reason);

            let documents = match load_documents(&config.documents_path()) {
                Ok(documents) => documents,
                Err(AppError::NotFound(_)) => collect_documents(config).await?,
                Err(e) => return Err(e),
            };

            build_and_persist_index(config, manager, &documents).await?;
            Ok(())
        }
        Err(e) => Err(e),
    }
}
