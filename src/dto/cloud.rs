use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{dao::models::TeamScoreRecord, dto::relay::PlayerSipsDto};

/// Row of the cloud mirror as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloudScoreDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub game_id: String,
    pub game_name: String,
    pub bar_id: String,
    pub bar_name: String,
    pub timestamp: i64,
    pub players: Vec<PlayerSipsDto>,
    pub bonus_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<TeamScoreRecord> for CloudScoreDto {
    fn from(value: TeamScoreRecord) -> Self {
        Self {
            id: value.id,
            game_id: value.game_id,
            game_name: value.game_name,
            bar_id: value.bar_id,
            bar_name: value.bar_name,
            timestamp: value.timestamp,
            players: value
                .players
                .into_iter()
                .map(|player| PlayerSipsDto {
                    name: player.name,
                    sips: player.sips,
                })
                .collect(),
            bonus_completed: value.bonus_completed,
            photo_url: value.photo_url,
            created_at: value.created_at,
        }
    }
}

/// Aggregated standing of one game in the cross-game leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LiveLeaderboardEntry {
    pub game_id: String,
    pub game_name: String,
    /// Distinct player names, in first-seen order.
    pub players: Vec<String>,
    pub total_score: i64,
    pub holes_played: usize,
}

/// Game known to the cloud mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CloudGameItem {
    pub game_id: String,
    pub game_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Query of the recent-photos route.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentPhotosQuery {
    /// Maximum number of photos, 20 when omitted.
    #[serde(default)]
    pub limit: Option<usize>,
}
