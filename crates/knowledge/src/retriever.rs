//! Query-time retrieval over the current index.

use crate::index::IndexManager;
use crate::types::Chunk;
use fplscout_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Default number of chunks retrieved per query.
pub const DEFAULT_TOP_K: usize = 5;

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk: Chunk,
    pub score: f32,
}

impl IndexManager {
    /// Retrieve the top-k chunks most similar to a query string.
    ///
    /// The query is embedded with the same provider used at build time and
    /// ranked against the current index. Returns `min(k, entry count)`
    /// chunks by non-increasing similarity; ties keep insertion order.
    /// Fails with `AppError::NoIndex` if no index has been built or loaded.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> AppResult<Vec<RetrievedChunk>> {
        if !self.has_index() {
            return Err(AppError::NoIndex);
        }

        tracing::debug!("Retrieving top-{} chunks for query: {}", top_k, query);

        let query_embedding = self.embedder().embed(query).await?;
        let results = self.search(&query_embedding, top_k)?;

        Ok(results
            .into_iter()
            .map(|(chunk, score)| RetrievedChunk { chunk, score })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::mock::MockProvider;
    use crate::types::{DocMetadata, DocType};
    use std::sync::Arc;

    fn chunk(id: &str, text: &str) -> Chunk {
        Chunk {
            id: id.to_string(),
            document_id: "doc-1".to_string(),
            position: 0,
            text: text.to_string(),
            metadata: DocMetadata {
                player_id: 1,
                player_name: "Test Player".to_string(),
                position: "Forward".to_string(),
                team_name: "Test FC".to_string(),
                doc_type: DocType::BasicInfo,
            },
        }
    }

    #[tokio::test]
    async fn test_retrieve_without_index() {
        let manager = IndexManager::new(Arc::new(MockProvider::new(64)));
        let result = manager.retrieve("anything", DEFAULT_TOP_K).await;
        assert!(matches!(result, Err(AppError::NoIndex)));
    }

    #[tokio::test]
    async fn test_retrieve_returns_min_of_k_and_count() {
        let mut manager = IndexManager::new(Arc::new(MockProvider::new(64)));
        manager
            .build(vec![
                chunk("c1", "striker scoring goals"),
                chunk("c2", "goalkeeper making saves"),
            ])
            .await
            .unwrap();

        let results = manager.retrieve("goals", 5).await.unwrap();
        assert_eq!(results.len(), 2);

        let results = manager.retrieve("goals", 1).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_retrieve_scores_are_non_increasing() {
        let mut manager = IndexManager::new(Arc::new(MockProvider::new(64)));
        manager
            .build(vec![
                chunk("c1", "goals assists points forward"),
                chunk("c2", "completely unrelated gardening advice"),
                chunk("c3", "forward with many goals"),
            ])
            .await
            .unwrap();

        let results = manager.retrieve("forward goals", 3).await.unwrap();
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
