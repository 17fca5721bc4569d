//! Crate-internal integration tests for the retrieval pipeline.

mod pipeline;
