//! Embedding capability: text -> fixed-length vector.
//!
//! The same provider instance is used when building the index and when
//! embedding queries, keeping build-time and query-time vectors in one
//! embedding space.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider, EmbeddingSettings};
