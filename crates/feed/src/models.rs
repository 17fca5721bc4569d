//! Typed models for the FPL feed.
//!
//! The wire structs (`Raw*`) mirror the feed's JSON with serde defaults so
//! that a missing field deserializes to its zero/empty form instead of
//! failing the record. `PlayerRecord` is the joined, cleaned shape the rest
//! of the pipeline consumes; it is immutable once a collection run completes
//! and replaced wholesale on the next refresh.

use serde::{Deserialize, Serialize};

/// Player position, mapped from the feed's `element_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Manager,
    Unknown,
}

impl Position {
    /// Map the feed's numeric `element_type` to a position.
    pub fn from_element_type(element_type: u8) -> Self {
        match element_type {
            1 => Self::Goalkeeper,
            2 => Self::Defender,
            3 => Self::Midfielder,
            4 => Self::Forward,
            5 => Self::Manager,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Goalkeeper => "Goalkeeper",
            Self::Defender => "Defender",
            Self::Midfielder => "Midfielder",
            Self::Forward => "Forward",
            Self::Manager => "Manager",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bulk snapshot payload: all players and teams.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBootstrap {
    #[serde(default)]
    pub elements: Vec<RawElement>,
    #[serde(default)]
    pub teams: Vec<RawTeam>,
}

/// One player row from the bulk snapshot.
///
/// The feed renders several numeric statistics as strings (form, points per
/// game, the ICT family); they are kept as strings and rendered verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawElement {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub web_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub second_name: String,
    #[serde(default)]
    pub team: u32,
    #[serde(default)]
    pub element_type: u8,
    #[serde(default)]
    pub selected_by_percent: String,
    #[serde(default)]
    pub now_cost: u32,
    #[serde(default)]
    pub form: String,
    #[serde(default)]
    pub points_per_game: String,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub clean_sheets: u32,
    #[serde(default)]
    pub goals_conceded: u32,
    #[serde(default)]
    pub yellow_cards: u32,
    #[serde(default)]
    pub red_cards: u32,
    #[serde(default)]
    pub saves: u32,
    #[serde(default)]
    pub bonus: u32,
    #[serde(default)]
    pub bps: i32,
    #[serde(default)]
    pub influence: String,
    #[serde(default)]
    pub creativity: String,
    #[serde(default)]
    pub threat: String,
    #[serde(default)]
    pub ict_index: String,
    #[serde(default)]
    pub value_season: String,
    #[serde(default)]
    pub transfers_in: u64,
    #[serde(default)]
    pub transfers_out: u64,
}

/// One team row from the bulk snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTeam {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

/// Per-player history payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RawElementSummary {
    #[serde(default)]
    pub history: Vec<RawFixtureHistory>,
}

/// One (player, fixture) row from the history payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFixtureHistory {
    #[serde(default)]
    pub opponent_team: u32,
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub assists: u32,
}

/// One match entry with the opponent resolved to a club name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub opponent: String,
    pub round: u32,
    pub total_points: i32,
    pub minutes: u32,
    pub goals_scored: u32,
    pub assists: u32,
}

/// A joined, cleaned player record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: u32,
    pub web_name: String,
    pub first_name: String,
    pub second_name: String,
    pub team_name: String,
    pub position: Position,
    /// Price in £M (the feed reports tenths)
    pub price: f64,
    pub selected_by_percent: String,
    pub form: String,
    pub points_per_game: String,
    pub total_points: i32,
    pub minutes: u32,
    pub goals_scored: u32,
    pub assists: u32,
    pub clean_sheets: u32,
    pub goals_conceded: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub saves: u32,
    pub bonus: u32,
    pub bps: i32,
    pub influence: String,
    pub creativity: String,
    pub threat: String,
    pub ict_index: String,
    pub value_season: String,
    pub transfers_in: u64,
    pub transfers_out: u64,
    /// Collection date, YYYY-MM-DD
    pub data_date: String,
}

impl PlayerRecord {
    /// Full player name ("first second"), trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.second_name)
            .trim()
            .to_string()
    }
}
