use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_with::{TimestampMilliSeconds, serde_as, skip_serializing_none};
use uuid::Uuid;

use crate::state::state_machine::SessionStatus;

/// Version written into new local snapshots.
pub const SNAPSHOT_VERSION: u32 = 0;

/// Envelope of the local state blob: the session collection plus the current pointer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedState {
    /// Persisted store content.
    pub state: PersistedGames,
    /// Layout version; blobs written before versioning read as `0`.
    #[serde(default)]
    pub version: u32,
}

/// Store content inside [`PersistedState`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedGames {
    /// Every session, in creation order.
    #[serde(default)]
    pub games: Vec<SessionEntity>,
    /// Session the active views follow.
    #[serde(default)]
    pub current_game_id: Option<Uuid>,
}

/// Bar snapshot stored inside a session course.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarEntity {
    /// Stable identifier of the bar.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Neighborhood.
    #[serde(default)]
    pub neighborhood: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Target sip count.
    pub par: u32,
    /// Latitude, if known.
    pub latitude: Option<f64>,
    /// Longitude, if known.
    pub longitude: Option<f64>,
    /// Bonus challenge text.
    pub bonus_task: Option<String>,
}

/// Roster entry stored inside a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Roster identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Color token.
    pub color: String,
}

/// Ledger entry stored inside a session.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntity {
    /// Player the sips belong to.
    pub player_id: Uuid,
    /// Hole the sips were recorded at.
    pub bar_id: String,
    /// Sip count.
    pub strokes: u32,
    /// Append time, in milliseconds since the Unix epoch.
    #[serde_as(as = "TimestampMilliSeconds<i64>")]
    pub timestamp: SystemTime,
    /// Bonus flag.
    #[serde(default)]
    pub bonus_completed: bool,
}

/// Session aggregate as written to the local snapshot.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionEntity {
    /// Primary key.
    pub id: Uuid,
    /// Session name.
    pub name: String,
    /// Creation time, in milliseconds since the Unix epoch.
    #[serde_as(as = "TimestampMilliSeconds<i64>")]
    pub date: SystemTime,
    /// Course snapshot.
    pub course: Vec<BarEntity>,
    /// Roster snapshot.
    pub players: Vec<PlayerEntity>,
    /// Ledger.
    #[serde(default)]
    pub scores: Vec<ScoreEntity>,
    /// Pointer into `course`.
    #[serde(default)]
    pub current_hole_index: usize,
    /// Lifecycle status.
    pub status: SessionStatus,
}

/// Sips reported for one player in a mirrored team score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSipsEntity {
    /// Player display name.
    pub name: String,
    /// Sips drunk at the bar.
    pub sips: u32,
}

/// Row of the cloud `team_scores` table.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamScoreRecord {
    /// Row identifier assigned by the database.
    pub id: Option<String>,
    /// Session identifier.
    pub game_id: String,
    /// Session name.
    pub game_name: String,
    /// Bar identifier.
    pub bar_id: String,
    /// Bar display name.
    pub bar_name: String,
    /// Submission time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Sips per player, zero counts included.
    pub players: Vec<PlayerSipsEntity>,
    /// Team bonus flag.
    pub bonus_completed: bool,
    /// Public URL of the team photo.
    pub photo_url: Option<String>,
    /// Row creation time assigned by the database.
    pub created_at: Option<String>,
}
