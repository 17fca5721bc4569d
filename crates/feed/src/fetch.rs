//! HTTP client for the FPL feed.
//!
//! Two read-only endpoints: the bulk snapshot of all players and teams, and
//! a per-player match history. Per-player history failures are logged and
//! skipped; they never abort the collection run.

use crate::models::{
    MatchEntry, PlayerRecord, Position, RawBootstrap, RawElementSummary, RawTeam,
};
use fplscout_core::{AppError, AppResult};
use std::collections::HashMap;
use std::time::Duration;

/// Request timeout for feed calls, in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Everything one collection run produces.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    /// All player records, joined with team names and positions
    pub records: Vec<PlayerRecord>,

    /// Per-player recent match history, keyed by player id
    pub histories: HashMap<u32, Vec<MatchEntry>>,
}

/// Read-only client for the FPL feed.
pub struct FeedClient {
    client: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    /// Create a client against the given feed base URL.
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self { client, base_url })
    }

    /// Fetch the bulk snapshot of all players and teams.
    pub async fn bootstrap(&self) -> AppResult<RawBootstrap> {
        let url = format!("{}bootstrap-static/", self.base_url);
        tracing::info!("Fetching bulk snapshot from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("Feed unreachable at {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::Fetch(format!(
                "Feed returned {} for {}",
                response.status(),
                url
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Fetch(format!("Malformed bulk snapshot payload: {}", e)))
    }

    /// Fetch one player's match history.
    pub async fn player_history(&self, player_id: u32) -> AppResult<RawElementSummary> {
        let url = format!("{}element-summary/{}/", self.base_url, player_id);
        tracing::debug!("Fetching history for player {} from {}", player_id, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("Feed unreachable at {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::Fetch(format!(
                "Feed returned {} for {}",
                response.status(),
                url
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Fetch(format!("Malformed history payload: {}", e)))
    }

    /// Run a full collection: bulk snapshot plus every player's history.
    ///
    /// Records are joined with team names, positions, and price in £M, and
    /// stamped with the collection date. A failed history fetch skips that
    /// player's history only.
    pub async fn collect(&self) -> AppResult<FeedSnapshot> {
        let bootstrap = self.bootstrap().await?;
        let team_names = team_name_map(&bootstrap.teams);
        let data_date = chrono::Local::now().format("%Y-%m-%d").to_string();

        let records: Vec<PlayerRecord> = bootstrap
            .elements
            .into_iter()
            .map(|element| PlayerRecord {
                id: element.id,
                web_name: element.web_name,
                first_name: element.first_name,
                second_name: element.second_name,
                team_name: team_names
                    .get(&element.team)
                    .cloned()
                    .unwrap_or_default(),
                position: Position::from_element_type(element.element_type),
                price: f64::from(element.now_cost) / 10.0,
                selected_by_percent: element.selected_by_percent,
                form: element.form,
                points_per_game: element.points_per_game,
                total_points: element.total_points,
                minutes: element.minutes,
                goals_scored: element.goals_scored,
                assists: element.assists,
                clean_sheets: element.clean_sheets,
                goals_conceded: element.goals_conceded,
                yellow_cards: element.yellow_cards,
                red_cards: element.red_cards,
                saves: element.saves,
                bonus: element.bonus,
                bps: element.bps,
                influence: element.influence,
                creativity: element.creativity,
                threat: element.threat,
                ict_index: element.ict_index,
                value_season: element.value_season,
                transfers_in: element.transfers_in,
                transfers_out: element.transfers_out,
                data_date: data_date.clone(),
            })
            .collect();

        tracing::info!("Collected {} player records", records.len());

        let mut histories = HashMap::new();
        for record in &records {
            match self.player_history(record.id).await {
                Ok(summary) => {
                    if summary.history.is_empty() {
                        continue;
                    }
                    let entries: Vec<MatchEntry> = summary
                        .history
                        .into_iter()
                        .map(|fixture| MatchEntry {
                            opponent: team_names
                                .get(&fixture.opponent_team)
                                .cloned()
                                .unwrap_or_else(|| "Unknown".to_string()),
                            round: fixture.round,
                            total_points: fixture.total_points,
                            minutes: fixture.minutes,
                            goals_scored: fixture.goals_scored,
                            assists: fixture.assists,
                        })
                        .collect();
                    histories.insert(record.id, entries);
                }
                Err(e) => {
                    // Per-player failures are isolated; the batch continues.
                    tracing::warn!(
                        "Failed to fetch history for player {} ({}): {}",
                        record.id,
                        record.web_name,
                        e
                    );
                }
            }
        }

        tracing::info!(
            "Collected match history for {} of {} players",
            histories.len(),
            records.len()
        );

        Ok(FeedSnapshot { records, histories })
    }
}

/// Build the team id -> name lookup.
fn team_name_map(teams: &[RawTeam]) -> HashMap<u32, String> {
    teams
        .iter()
        .map(|team| (team.id, team.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_normalizes_base_url() {
        let with_slash = FeedClient::new("https://example.test/api/").unwrap();
        let without_slash = FeedClient::new("https://example.test/api").unwrap();
        assert_eq!(with_slash.base_url, without_slash.base_url);
    }

    #[test]
    fn test_team_name_map() {
        let teams = vec![
            RawTeam {
                id: 1,
                name: "Arsenal".to_string(),
            },
            RawTeam {
                id: 2,
                name: "Man City".to_string(),
            },
        ];
        let map = team_name_map(&teams);
        assert_eq!(map.get(&1).map(String::as_str), Some("Arsenal"));
        assert_eq!(map.get(&2).map(String::as_str), Some("Man City"));
        assert!(map.get(&99).is_none());
    }
}
