//! End-to-end tests for the document -> chunk -> index -> retrieve pipeline.

use crate::chunker::chunk_documents;
use crate::embeddings::providers::mock::MockProvider;
use crate::index::IndexManager;
use crate::types::{DocMetadata, Document, DocType};
use fplscout_core::AppError;
use std::sync::Arc;
use tempfile::TempDir;

fn haaland_document() -> Document {
    Document::new(
        "Player: Erling Haaland (Haaland)\n\
         Team: Man City\n\
         Position: Forward\n\
         Price: £14.1M\n\
         Total points: 200\n\
         Goals: 27\n\
         Assists: 5\n",
        DocMetadata {
            player_id: 355,
            player_name: "Erling Haaland".to_string(),
            position: "Forward".to_string(),
            team_name: "Man City".to_string(),
            doc_type: DocType::BasicInfo,
        },
    )
}

fn filler_document(name: &str, position: &str, text: &str) -> Document {
    Document::new(
        text,
        DocMetadata {
            player_id: 1,
            player_name: name.to_string(),
            position: position.to_string(),
            team_name: "Other FC".to_string(),
            doc_type: DocType::BasicInfo,
        },
    )
}

#[tokio::test]
async fn test_top_forward_query_retrieves_haaland_chunk() {
    let documents = vec![
        haaland_document(),
        filler_document(
            "Jordan Pickford",
            "Goalkeeper",
            "Player: Jordan Pickford\nPosition: Goalkeeper\nSaves: 90\nClean sheets: 10\n",
        ),
        filler_document(
            "Virgil van Dijk",
            "Defender",
            "Player: Virgil van Dijk\nPosition: Defender\nClean sheets: 12\nGoals conceded: 28\n",
        ),
    ];

    let chunks = chunk_documents(&documents, 1000, 100).unwrap();
    let mut manager = IndexManager::new(Arc::new(MockProvider::new(256)));
    let stats = manager.build(chunks).await.unwrap();
    assert_eq!(stats.indexed, 3);

    let results = manager.retrieve("who is the top forward", 5).await.unwrap();
    assert!(
        results
            .iter()
            .any(|r| r.chunk.metadata.player_name == "Erling Haaland"),
        "expected the Haaland chunk in the retrieved context"
    );
}

#[tokio::test]
async fn test_missing_snapshot_triggers_rebuild_fallback() {
    let temp = TempDir::new().unwrap();
    let location = temp.path().join("index");

    let mut manager = IndexManager::new(Arc::new(MockProvider::new(256)));

    // Loading from a location that does not exist is recoverable: fall back
    // to the full build-and-persist path.
    match manager.load(&location) {
        Err(AppError::NotFound(_)) => {
            let chunks = chunk_documents(&[haaland_document()], 1000, 100).unwrap();
            manager.build(chunks).await.unwrap();
            manager.persist(&location).unwrap();
        }
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }

    // The fallback path ends in a valid, queryable index.
    assert!(manager.has_index());
    let results = manager.retrieve("top forward", 5).await.unwrap();
    assert_eq!(results.len(), 1);

    // And the persisted snapshot loads cleanly next time.
    let mut next = IndexManager::new(Arc::new(MockProvider::new(256)));
    next.load(&location).unwrap();
    assert_eq!(next.stats().unwrap().entries, 1);
}

#[tokio::test]
async fn test_round_trip_identical_retrieval_through_chunked_documents() {
    let temp = TempDir::new().unwrap();
    let long_text = format!(
        "Recent performance for Erling Haaland:\n{}",
        "Match against Arsenal (GW 10): Points: 13, Minutes: 90, Goals: 2, Assists: 0\n"
            .repeat(20)
    );
    let documents = vec![
        haaland_document(),
        Document::new(
            long_text,
            DocMetadata {
                player_id: 355,
                player_name: "Erling Haaland".to_string(),
                position: "Forward".to_string(),
                team_name: "Man City".to_string(),
                doc_type: DocType::RecentPerformance,
            },
        ),
    ];

    let chunks = chunk_documents(&documents, 200, 40).unwrap();
    assert!(chunks.len() > 2);

    let mut manager = IndexManager::new(Arc::new(MockProvider::new(256)));
    manager.build(chunks).await.unwrap();

    let before: Vec<(String, u32)> = manager
        .retrieve("haaland goals against arsenal", 4)
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.chunk.id, r.chunk.position))
        .collect();

    manager.persist(temp.path()).unwrap();

    let mut reloaded = IndexManager::new(Arc::new(MockProvider::new(256)));
    reloaded.load(temp.path()).unwrap();

    let after: Vec<(String, u32)> = reloaded
        .retrieve("haaland goals against arsenal", 4)
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.chunk.id, r.chunk.position))
        .collect();

    assert_eq!(before, after);
}
