use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::session::{PlayerView, SessionStatusDto},
    state::{
        game::GameSession, leaderboard::LeaderboardEntry, state_machine::SessionStatus,
    },
};

/// One ranked player.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardRow {
    /// 1-based rank in leaderboard order.
    pub position: usize,
    pub player: PlayerView,
    pub raw_strokes: u64,
    pub bonus_count: u64,
    pub total_score: i64,
    pub relative_to_par: i64,
}

/// Ranked leaderboard of a session.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub session_id: Uuid,
    pub status: SessionStatusDto,
    pub total_par: u64,
    pub entries: Vec<LeaderboardRow>,
    /// First row while the game is running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader: Option<LeaderboardRow>,
    /// First row once the game is completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<LeaderboardRow>,
}

impl LeaderboardResponse {
    pub fn build(session: &GameSession, total_par: u64, entries: Vec<LeaderboardEntry>) -> Self {
        let rows: Vec<LeaderboardRow> = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| LeaderboardRow {
                position: index + 1,
                player: PlayerView::from(&entry.player),
                raw_strokes: entry.raw_strokes,
                bonus_count: entry.bonus_count,
                total_score: entry.total_score,
                relative_to_par: entry.relative_to_par,
            })
            .collect();

        let first = rows.first().cloned();
        let (leader, winner) = match session.status {
            SessionStatus::InProgress => (first, None),
            SessionStatus::Completed => (None, first),
            SessionStatus::Setup => (None, None),
        };

        Self {
            session_id: session.id,
            status: session.status.into(),
            total_par,
            entries: rows,
            leader,
            winner,
        }
    }
}

/// Total of a single player.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerScoreResponse {
    pub session_id: Uuid,
    pub player_id: Uuid,
    pub total_score: i64,
}
