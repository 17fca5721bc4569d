//! Document builder: player records -> text documents.
//!
//! Pure transformation. Each record yields one `basic_info` document
//! rendering every statistic field; records with match history also yield
//! one `recent_performance` document over the most recent five entries.
//! Missing values render as their zero/empty form; omitting a line would
//! silently degrade retrievability.

use crate::models::{MatchEntry, PlayerRecord};
use fplscout_core::{AppError, AppResult};
use fplscout_knowledge::{DocMetadata, DocType, Document};
use std::collections::HashMap;
use std::path::Path;

/// Number of most recent match entries summarized per player.
const RECENT_MATCH_COUNT: usize = 5;

/// Build documents from records and optional per-player match histories.
///
/// A record without a usable player name is skipped with a warning; the
/// batch continues.
pub fn build_documents(
    records: &[PlayerRecord],
    histories: &HashMap<u32, Vec<MatchEntry>>,
) -> Vec<Document> {
    let mut documents = Vec::with_capacity(records.len());

    for record in records {
        let name = display_name(record);
        let Some(name) = name else {
            tracing::warn!(
                "Skipping documents for player {}: no usable name",
                record.id
            );
            continue;
        };

        documents.push(Document::new(
            render_basic_info(record, &name),
            DocMetadata {
                player_id: record.id,
                player_name: name.clone(),
                position: record.position.to_string(),
                team_name: record.team_name.clone(),
                doc_type: DocType::BasicInfo,
            },
        ));

        if let Some(entries) = histories.get(&record.id) {
            if !entries.is_empty() {
                documents.push(Document::new(
                    render_recent_performance(&name, entries),
                    DocMetadata {
                        player_id: record.id,
                        player_name: name,
                        position: record.position.to_string(),
                        team_name: record.team_name.clone(),
                        doc_type: DocType::RecentPerformance,
                    },
                ));
            }
        }
    }

    tracing::info!(
        "Built {} documents from {} records",
        documents.len(),
        records.len()
    );

    documents
}

/// Resolve the name used in document text and metadata.
///
/// Falls back to the web name when first/second names are blank; a record
/// with no name at all cannot produce a useful document.
fn display_name(record: &PlayerRecord) -> Option<String> {
    let full = record.full_name();
    if !full.is_empty() {
        return Some(full);
    }

    let web = record.web_name.trim();
    if !web.is_empty() {
        return Some(web.to_string());
    }

    None
}

/// Render the fixed-format `basic_info` text for one record.
fn render_basic_info(record: &PlayerRecord, name: &str) -> String {
    format!(
        "Player: {} ({})\n\
         Team: {}\n\
         Position: {}\n\
         Price: £{}M\n\
         Selected by: {}%\n\
         Form: {}\n\
         Points per game: {}\n\
         Total points: {}\n\
         Minutes played: {}\n\
         Goals: {}\n\
         Assists: {}\n\
         Clean sheets: {}\n\
         Goals conceded: {}\n\
         Yellow cards: {}\n\
         Red cards: {}\n\
         Saves: {}\n\
         Bonus points: {}\n\
         BPS: {}\n\
         Influence: {}\n\
         Creativity: {}\n\
         Threat: {}\n\
         ICT Index: {}\n\
         Value season: {}\n\
         Transfers in: {}\n\
         Transfers out: {}\n\
         Data as of: {}\n",
        name,
        record.web_name,
        record.team_name,
        record.position,
        record.price,
        record.selected_by_percent,
        record.form,
        record.points_per_game,
        record.total_points,
        record.minutes,
        record.goals_scored,
        record.assists,
        record.clean_sheets,
        record.goals_conceded,
        record.yellow_cards,
        record.red_cards,
        record.saves,
        record.bonus,
        record.bps,
        record.influence,
        record.creativity,
        record.threat,
        record.ict_index,
        record.value_season,
        record.transfers_in,
        record.transfers_out,
        record.data_date,
    )
}

/// Render the `recent_performance` text over the most recent entries.
fn render_recent_performance(name: &str, entries: &[MatchEntry]) -> String {
    let recent = &entries[entries.len().saturating_sub(RECENT_MATCH_COUNT)..];

    let mut text = format!("Recent performance for {}:\n", name);
    for entry in recent {
        text.push_str(&format!(
            "Match against {} (GW {}): Points: {}, Minutes: {}, Goals: {}, Assists: {}\n",
            entry.opponent,
            entry.round,
            entry.total_points,
            entry.minutes,
            entry.goals_scored,
            entry.assists,
        ));
    }

    text
}

/// Save documents to a JSON file.
pub fn save_documents(path: &Path, documents: &[Document]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(documents)?;
    std::fs::write(path, json)?;

    tracing::info!("Saved {} documents to {:?}", documents.len(), path);
    Ok(())
}

/// Load documents from a JSON file.
pub fn load_documents(path: &Path) -> AppResult<Vec<Document>> {
    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "No documents file at {:?}",
            path
        )));
    }

    let contents = std::fs::read_to_string(path)?;
    let documents: Vec<Document> = serde_json::from_str(&contents)?;

    tracing::info!("Loaded {} documents from {:?}", documents.len(), path);
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    fn record(id: u32, first: &str, second: &str) -> PlayerRecord {
        PlayerRecord {
            id,
            web_name: second.to_string(),
            first_name: first.to_string(),
            second_name: second.to_string(),
            team_name: "Man City".to_string(),
            position: Position::Forward,
            price: 14.1,
            selected_by_percent: "84.3".to_string(),
            form: "9.5".to_string(),
            points_per_game: "8.1".to_string(),
            total_points: 200,
            minutes: 2160,
            goals_scored: 27,
            assists: 5,
            clean_sheets: 0,
            goals_conceded: 0,
            yellow_cards: 2,
            red_cards: 0,
            saves: 0,
            bonus: 18,
            bps: 712,
            influence: "1102.4".to_string(),
            creativity: "250.8".to_string(),
            threat: "1503.0".to_string(),
            ict_index: "285.6".to_string(),
            value_season: "14.2".to_string(),
            transfers_in: 2_500_000,
            transfers_out: 400_000,
            data_date: "2026-08-06".to_string(),
        }
    }

    fn entry(opponent: &str, round: u32, points: i32) -> MatchEntry {
        MatchEntry {
            opponent: opponent.to_string(),
            round,
            total_points: points,
            minutes: 90,
            goals_scored: 1,
            assists: 0,
        }
    }

    #[test]
    fn test_one_basic_info_document_per_record() {
        let records = vec![record(1, "Erling", "Haaland"), record(2, "Mohamed", "Salah")];
        let documents = build_documents(&records, &HashMap::new());

        assert_eq!(documents.len(), 2);
        assert!(documents
            .iter()
            .all(|d| d.metadata.doc_type == DocType::BasicInfo));
    }

    #[test]
    fn test_basic_info_renders_every_field() {
        let records = vec![record(1, "Erling", "Haaland")];
        let documents = build_documents(&records, &HashMap::new());
        let text = &documents[0].text;

        assert!(text.contains("Player: Erling Haaland (Haaland)"));
        assert!(text.contains("Team: Man City"));
        assert!(text.contains("Position: Forward"));
        assert!(text.contains("Price: £14.1M"));
        assert!(text.contains("Total points: 200"));
        assert!(text.contains("ICT Index: 285.6"));
        assert!(text.contains("Transfers out: 400000"));
        assert!(text.contains("Data as of: 2026-08-06"));
    }

    #[test]
    fn test_missing_values_render_as_zero_forms() {
        let mut r = record(1, "Erling", "Haaland");
        r.form = String::new();
        r.total_points = 0;
        let documents = build_documents(&[r], &HashMap::new());
        let text = &documents[0].text;

        // Fields are present with their zero/empty rendering, never omitted
        assert!(text.contains("Form: \n"));
        assert!(text.contains("Total points: 0"));
    }

    #[test]
    fn test_recent_performance_for_players_with_history() {
        let records = vec![record(1, "Erling", "Haaland")];
        let mut histories = HashMap::new();
        histories.insert(1, vec![entry("Arsenal", 10, 13), entry("Chelsea", 11, 2)]);

        let documents = build_documents(&records, &histories);
        assert_eq!(documents.len(), 2);

        let perf = documents
            .iter()
            .find(|d| d.metadata.doc_type == DocType::RecentPerformance)
            .unwrap();
        assert!(perf.text.contains("Recent performance for Erling Haaland"));
        assert!(perf.text.contains("Match against Arsenal (GW 10)"));
        assert!(perf.text.contains("Match against Chelsea (GW 11)"));
        assert_eq!(perf.metadata.player_id, 1);
    }

    #[test]
    fn test_recent_performance_limited_to_last_five() {
        let records = vec![record(1, "Erling", "Haaland")];
        let mut histories = HashMap::new();
        histories.insert(
            1,
            (1..=8).map(|gw| entry("Opponent", gw, 5)).collect::<Vec<_>>(),
        );

        let documents = build_documents(&records, &histories);
        let perf = documents
            .iter()
            .find(|d| d.metadata.doc_type == DocType::RecentPerformance)
            .unwrap();

        // Only the most recent five gameweeks appear
        for gw in 4..=8 {
            assert!(perf.text.contains(&format!("(GW {})", gw)));
        }
        for gw in 1..=3 {
            assert!(!perf.text.contains(&format!("(GW {})", gw)));
        }
    }

    #[test]
    fn test_empty_history_yields_no_performance_document() {
        let records = vec![record(1, "Erling", "Haaland")];
        let mut histories = HashMap::new();
        histories.insert(1, Vec::new());

        let documents = build_documents(&records, &histories);
        assert_eq!(documents.len(), 1);
    }

    #[test]
    fn test_record_without_name_is_skipped() {
        let mut nameless = record(1, "", "");
        nameless.web_name = String::new();
        let records = vec![nameless, record(2, "Mohamed", "Salah")];

        let documents = build_documents(&records, &HashMap::new());
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].metadata.player_name, "Mohamed Salah");
    }

    #[test]
    fn test_web_name_fallback() {
        let mut r = record(1, "", "");
        r.web_name = "Haaland".to_string();
        let documents = build_documents(&[r], &HashMap::new());
        assert_eq!(documents[0].metadata.player_name, "Haaland");
    }

    #[test]
    fn test_save_and_load_documents_round_trip() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("documents.json");

        let records = vec![record(1, "Erling", "Haaland")];
        let documents = build_documents(&records, &HashMap::new());

        save_documents(&path, &documents).unwrap();
        let loaded = load_documents(&path).unwrap();

        assert_eq!(loaded.len(), documents.len());
        assert_eq!(loaded[0].id, documents[0].id);
        assert_eq!(loaded[0].text, documents[0].text);
    }

    #[test]
    fn test_load_missing_documents_is_not_found() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = load_documents(&temp.path().join("missing.json"));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
