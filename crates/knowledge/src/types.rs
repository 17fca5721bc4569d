//! Retrieval pipeline type definitions.

use serde::{Deserialize, Serialize};

/// Kind of document derived from a player record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    /// Full season-cumulative statistics rendering
    BasicInfo,
    /// Summary of the most recent match entries
    RecentPerformance,
}

impl DocType {
    /// Canonical string form, as stored in document metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BasicInfo => "basic_info",
            Self::RecentPerformance => "recent_performance",
        }
    }
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured metadata attached to a document and inherited by its chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocMetadata {
    /// Feed identifier of the player
    pub player_id: u32,

    /// Full player name
    pub player_name: String,

    /// Position name (Goalkeeper, Defender, Midfielder, Forward, Manager)
    pub position: String,

    /// Club name
    pub team_name: String,

    /// Document kind
    pub doc_type: DocType,
}

/// An immutable text document with attached metadata.
///
/// Created once from a player record and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier
    pub id: String,

    /// Rendered text content
    pub text: String,

    /// Structured metadata
    pub metadata: DocMetadata,
}

impl Document {
    /// Create a document with a fresh identifier.
    pub fn new(text: impl Into<String>, metadata: DocMetadata) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            metadata,
        }
    }
}

/// A contiguous window of a document's text.
///
/// Inherits the parent document's metadata unchanged and records its
/// position within the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk identifier
    pub id: String,

    /// Identifier of the parent document
    pub document_id: String,

    /// Window position within the parent document
    pub position: u32,

    /// Text content
    pub text: String,

    /// Metadata inherited from the parent document
    pub metadata: DocMetadata,
}
