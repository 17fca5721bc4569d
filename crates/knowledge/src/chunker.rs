//! Text chunking with configurable size and overlap.
//!
//! Windows are measured in characters so that consecutive chunks share
//! exactly the configured overlap regardless of UTF-8 byte widths.

use crate::types::{Chunk, Document};
use fplscout_core::{AppError, AppResult};

/// Split documents into overlapping chunks.
///
/// Each document shorter than `max_len` yields exactly one chunk equal to the
/// whole document. Longer documents are split into consecutive windows of at
/// most `max_len` characters, stepping by `max_len - overlap`, so neighboring
/// chunks share exactly `overlap` characters. Chunk order is the
/// concatenation of per-document window order in input order, and every chunk
/// inherits its parent document's metadata unchanged.
pub fn chunk_documents(
    documents: &[Document],
    max_len: usize,
    overlap: usize,
) -> AppResult<Vec<Chunk>> {
    if max_len == 0 {
        return Err(AppError::Config(
            "Chunk size must be greater than zero".to_string(),
        ));
    }
    if overlap >= max_len {
        return Err(AppError::Config(format!(
            "Chunk overlap ({}) must be smaller than chunk size ({})",
            overlap, max_len
        )));
    }

    let mut chunks = Vec::new();

    for document in documents {
        for (position, text) in chunk_text(&document.text, max_len, overlap)
            .into_iter()
            .enumerate()
        {
            chunks.push(Chunk {
                id: uuid::Uuid::new_v4().to_string(),
                document_id: document.id.clone(),
                position: position as u32,
                text,
                metadata: document.metadata.clone(),
            });
        }
    }

    tracing::debug!(
        "Chunked {} documents into {} chunks (size: {}, overlap: {})",
        documents.len(),
        chunks.len(),
        max_len,
        overlap
    );

    Ok(chunks)
}

/// Split a single text into overlapping character windows.
fn chunk_text(text: &str, max_len: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    // Byte offsets of every char boundary, including the end of the text.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = bounds.len() - 1;

    if char_count <= max_len {
        return vec![text.to_string()];
    }

    let step = max_len - overlap;
    let mut windows = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + max_len).min(char_count);
        windows.push(text[bounds[start]..bounds[end]].to_string());

        if end == char_count {
            break;
        }
        start += step;
    }

    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocMetadata, DocType};

    fn doc(text: &str) -> Document {
        Document::new(
            text,
            DocMetadata {
                player_id: 7,
                player_name: "Test Player".to_string(),
                position: "Midfielder".to_string(),
                team_name: "Test FC".to_string(),
                doc_type: DocType::BasicInfo,
            },
        )
    }

    #[test]
    fn test_short_document_single_chunk() {
        let document = doc("short text");
        let chunks = chunk_documents(std::slice::from_ref(&document), 100, 10).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, document.text);
        assert_eq!(chunks[0].document_id, document.id);
        assert_eq!(chunks[0].position, 0);
    }

    #[test]
    fn test_exact_length_single_chunk() {
        let document = doc(&"a".repeat(100));
        let chunks = chunk_documents(std::slice::from_ref(&document), 100, 10).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_consecutive_chunks_share_exact_overlap() {
        let text: String = ('a'..='z').cycle().take(250).collect();
        let document = doc(&text);
        let chunks = chunk_documents(std::slice::from_ref(&document), 100, 20).unwrap();

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].text.chars().collect();
            let tail: String = prev[prev.len() - 20..].iter().collect();
            let head: String = pair[1].text.chars().take(20).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn test_deoverlapped_concatenation_reconstructs_text() {
        let text: String = ('a'..='z').cycle().take(333).collect();
        let document = doc(&text);
        let overlap = 25;
        let chunks = chunk_documents(std::slice::from_ref(&document), 100, overlap).unwrap();

        let mut rebuilt: String = chunks[0].text.clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.text.chars().skip(overlap));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_metadata_inherited_unchanged() {
        let document = doc(&"x".repeat(500));
        let chunks = chunk_documents(std::slice::from_ref(&document), 100, 10).unwrap();

        for chunk in &chunks {
            assert_eq!(chunk.metadata, document.metadata);
        }
    }

    #[test]
    fn test_positions_are_sequential() {
        let document = doc(&"x".repeat(500));
        let chunks = chunk_documents(std::slice::from_ref(&document), 100, 10).unwrap();

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.position, i as u32);
        }
    }

    #[test]
    fn test_multibyte_boundaries() {
        let text: String = "£é€".chars().cycle().take(90).collect();
        let document = doc(&text);
        let chunks = chunk_documents(std::slice::from_ref(&document), 40, 10).unwrap();

        // Windows are char-aligned, so every slice is valid UTF-8 and
        // de-overlapped concatenation still reconstructs the text.
        let mut rebuilt: String = chunks[0].text.clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.text.chars().skip(10));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let document = doc("text");
        let result = chunk_documents(std::slice::from_ref(&document), 10, 10);
        assert!(result.is_err());
    }

    #[test]
    fn test_order_preserved_across_documents() {
        let first = doc(&"a".repeat(250));
        let second = doc(&"b".repeat(250));
        let chunks = chunk_documents(&[first.clone(), second.clone()], 100, 10).unwrap();

        let boundary = chunks
            .iter()
            .position(|c| c.document_id == second.id)
            .unwrap();
        assert!(chunks[..boundary]
            .iter()
            .all(|c| c.document_id == first.id));
        assert!(chunks[boundary..]
            .iter()
            .all(|c| c.document_id == second.id));
    }
}
