//! FPL feed ingestion for fplscout.
//!
//! Pulls the bulk player snapshot and per-player match history from the
//! Fantasy Premier League feed, joins them into typed records, and renders
//! them as text documents for the retrieval pipeline.

pub mod documents;
pub mod fetch;
pub mod models;

pub use documents::{build_documents, load_documents, save_documents};
pub use fetch::{FeedClient, FeedSnapshot};
pub use models::{MatchEntry, PlayerRecord, Position};
