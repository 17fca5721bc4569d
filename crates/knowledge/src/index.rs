//! In-memory vector index with whole-unit snapshot persistence.
//!
//! The index is a flat list of (embedding, chunk) entries searched by
//! brute-force cosine similarity. It is built from all chunks in one batch,
//! saved to disk as a single JSON snapshot, and reloaded as a unit; a rebuild
//! replaces the whole index.

use crate::embeddings::EmbeddingProvider;
use crate::types::Chunk;
use chrono::{DateTime, Utc};
use fplscout_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// File name of the snapshot inside the index location.
pub const INDEX_FILE: &str = "index.json";

/// One indexed chunk with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// Snapshot header describing how the index was built.
///
/// The embedding model recorded here must match the configured provider at
/// load time: query vectors from a different model would silently degrade
/// retrieval relevance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexManifest {
    pub provider: String,
    pub model: String,
    pub dimensions: usize,
    pub entries: usize,
    pub built_at: DateTime<Utc>,
}

/// On-disk snapshot: manifest + all entries, serialized as one unit.
#[derive(Debug, Serialize, Deserialize)]
struct IndexSnapshot {
    manifest: IndexManifest,
    entries: Vec<IndexEntry>,
}

/// The in-memory similarity index.
#[derive(Debug)]
pub struct VectorIndex {
    manifest: IndexManifest,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Search for the top-k most similar chunks to the query embedding.
    ///
    /// Returns `min(k, len)` chunks ordered by non-increasing similarity.
    /// The sort is stable, so equal scores keep insertion order.
    fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<(Chunk, f32)> {
        let mut scored: Vec<(Chunk, f32)> = self
            .entries
            .iter()
            .map(|entry| {
                (
                    entry.chunk.clone(),
                    cosine_similarity(query_embedding, &entry.embedding),
                )
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }
}

/// Counts reported by a build operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuildStats {
    /// Chunks embedded and indexed
    pub indexed: usize,

    /// Chunks excluded because their text could not be embedded
    pub skipped: usize,
}

/// Statistics about the current index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    pub entries: usize,
    pub dimensions: usize,
    pub provider: String,
    pub model: String,
    pub built_at: DateTime<Utc>,
}

/// Owner of the similarity index.
///
/// Holds the index exclusively: `build` and `load` replace it wholesale,
/// `persist` writes it out as a unit. Single-owner mutable state; no
/// locking is needed under the request-per-call model.
pub struct IndexManager {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Option<VectorIndex>,
}

impl IndexManager {
    /// Create a manager with no index yet.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            index: None,
        }
    }

    /// The embedding provider used at both build and query time.
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Whether an index has been built or loaded.
    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// Build a fresh index from chunks, replacing any previous one.
    ///
    /// A chunk whose text cannot be embedded (e.g., empty string) is
    /// excluded with a warning; the rest proceed. The number of exclusions
    /// is reported in the returned stats.
    pub async fn build(&mut self, chunks: Vec<Chunk>) -> AppResult<BuildStats> {
        let total = chunks.len();
        tracing::info!("Building index from {} chunks", total);

        let mut entries = Vec::with_capacity(total);
        let mut skipped = 0usize;

        for chunk in chunks {
            let embedded = self.embedder.embed(&chunk.text).await;
            match embedded {
                Ok(embedding) => entries.push(IndexEntry { chunk, embedding }),
                Err(AppError::Embedding(reason)) => {
                    tracing::warn!(
                        "Excluding chunk {} from index: {}",
                        chunk.id,
                        reason
                    );
                    skipped += 1;
                }
                Err(other) => return Err(other),
            }
        }

        if entries.is_empty() && skipped > 0 {
            tracing::warn!("All {} chunks were excluded; index is empty", skipped);
        }

        let manifest = IndexManifest {
            provider: self.embedder.provider_name().to_string(),
            model: self.embedder.model_name().to_string(),
            dimensions: self.embedder.dimensions(),
            entries: entries.len(),
            built_at: Utc::now(),
        };

        let stats = BuildStats {
            indexed: entries.len(),
            skipped,
        };

        self.index = Some(VectorIndex { manifest, entries });

        tracing::info!(
            "Index built: {} entries, {} excluded",
            stats.indexed,
            stats.skipped
        );

        Ok(stats)
    }

    /// Persist the current index to `location` as one snapshot.
    ///
    /// The snapshot is written to a temporary file and renamed into place,
    /// atomically replacing any prior contents at that location.
    pub fn persist(&self, location: &Path) -> AppResult<()> {
        let index = self.index.as_ref().ok_or_else(|| {
            AppError::Persistence("No index has been built; nothing to persist".to_string())
        })?;

        std::fs::create_dir_all(location).map_err(|e| {
            AppError::Persistence(format!(
                "Failed to create index directory {:?}: {}",
                location, e
            ))
        })?;

        let snapshot = IndexSnapshot {
            manifest: index.manifest.clone(),
            entries: index.entries.clone(),
        };

        let json = serde_json::to_string(&snapshot)
            .map_err(|e| AppError::Persistence(format!("Failed to serialize index: {}", e)))?;

        let final_path = location.join(INDEX_FILE);
        let tmp_path = location.join(format!("{}.tmp", INDEX_FILE));

        std::fs::write(&tmp_path, json).map_err(|e| {
            AppError::Persistence(format!("Failed to write snapshot {:?}: {}", tmp_path, e))
        })?;

        std::fs::rename(&tmp_path, &final_path).map_err(|e| {
            AppError::Persistence(format!(
                "Failed to move snapshot into place at {:?}: {}",
                final_path, e
            ))
        })?;

        tracing::info!(
            "Persisted index ({} entries) to {:?}",
            index.entries.len(),
            final_path
        );

        Ok(())
    }

    /// Load a previously persisted index from `location`, replacing any
    /// currently held index.
    ///
    /// A missing or unparsable snapshot is `AppError::NotFound`, a
    /// recoverable condition; callers fall back to the full
    /// collect -> build -> persist path. A snapshot built with a different
    /// embedding model than the configured provider is rejected with
    /// `AppError::Persistence`.
    pub fn load(&mut self, location: &Path) -> AppResult<()> {
        let path = location.join(INDEX_FILE);

        if !path.exists() {
            return Err(AppError::NotFound(format!(
                "No index snapshot at {:?}",
                path
            )));
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!(
                    "No index snapshot at {:?}",
                    path
                )))
            }
            Err(e) => {
                return Err(AppError::Persistence(format!(
                    "Failed to read snapshot {:?}: {}",
                    path, e
                )))
            }
        };

        let snapshot: IndexSnapshot = serde_json::from_str(&contents).map_err(|e| {
            AppError::NotFound(format!("{:?} is not a valid index snapshot: {}", path, e))
        })?;

        if snapshot.manifest.model != self.embedder.model_name()
            || snapshot.manifest.provider != self.embedder.provider_name()
        {
            return Err(AppError::Persistence(format!(
                "Index at {:?} was built with embedding model '{}/{}' but '{}/{}' is configured; \
                 rebuild the index or switch the embedding provider",
                path,
                snapshot.manifest.provider,
                snapshot.manifest.model,
                self.embedder.provider_name(),
                self.embedder.model_name(),
            )));
        }

        tracing::info!(
            "Loaded index ({} entries, model {}) from {:?}",
            snapshot.entries.len(),
            snapshot.manifest.model,
            path
        );

        self.index = Some(VectorIndex {
            manifest: snapshot.manifest,
            entries: snapshot.entries,
        });

        Ok(())
    }

    /// Search the current index for the top-k most similar chunks.
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<(Chunk, f32)>> {
        let index = self.index.as_ref().ok_or(AppError::NoIndex)?;
        let results = index.search(query_embedding, top_k);

        tracing::debug!(
            "Retrieved {} chunks (requested top-{})",
            results.len(),
            top_k
        );

        Ok(results)
    }

    /// Get statistics about the current index.
    pub fn stats(&self) -> AppResult<IndexStats> {
        let index = self.index.as_ref().ok_or(AppError::NoIndex)?;
        Ok(IndexStats {
            entries: index.len(),
            dimensions: index.manifest.dimensions,
            provider: index.manifest.provider.clone(),
            model: index.manifest.model.clone(),
            built_at: index.manifest.built_at,
        })
    }
}

/// Calculate cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
