use std::time::SystemTime;

use uuid::Uuid;

use crate::{
    dao::models::{BarEntity, PlayerEntity, ScoreEntity, SessionEntity},
    state::state_machine::SessionStatus,
};

/// Identifier of a game session.
pub type SessionId = Uuid;
/// Identifier of a player inside a session roster.
pub type PlayerId = Uuid;
/// Identifier of a bar (hole) inside a course.
pub type HoleId = String;

/// A stop on the course.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Stable identifier of the bar (e.g. `bar-3`).
    pub id: HoleId,
    /// Display name.
    pub name: String,
    /// Neighborhood shown next to the name.
    pub neighborhood: String,
    /// Street address, display only.
    pub address: String,
    /// Target sip count. Zero marks a non-scoring food stop.
    pub par: u32,
    /// Optional latitude for the map view.
    pub latitude: Option<f64>,
    /// Optional longitude for the map view.
    pub longitude: Option<f64>,
    /// Free-text team challenge for this stop.
    pub bonus_task: Option<String>,
}

/// A participant in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Roster identifier.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Color token assigned round-robin from the configured palette.
    pub color: String,
}

/// One ledger fact: this player drank this many sips at this hole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Player the sips belong to. Not guaranteed to be in the roster.
    pub player_id: PlayerId,
    /// Hole the sips were recorded at.
    pub hole_id: HoleId,
    /// Sip count.
    pub strokes: u32,
    /// Wall-clock time the entry was appended.
    pub recorded_at: SystemTime,
    /// Whether the team completed the bonus task with this submission.
    pub bonus_completed: bool,
}

/// Raw input for a ledger append; the hole and timestamp are stamped by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreInput {
    /// Player the sips belong to.
    pub player_id: PlayerId,
    /// Sip count.
    pub strokes: u32,
    /// Bonus flag for this entry.
    pub bonus_completed: bool,
}

/// Aggregate root: a course snapshot, a roster snapshot and the append-only score ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    /// Primary key of the session.
    pub id: SessionId,
    /// Name chosen at setup.
    pub name: String,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Ordered holes, fixed at creation.
    pub course: Vec<Bar>,
    /// Roster, fixed at creation.
    pub players: Vec<Player>,
    /// Append-only ledger.
    pub scores: Vec<Score>,
    /// Zero-based pointer into `course`.
    pub current_hole_index: usize,
    /// Lifecycle status.
    pub status: SessionStatus,
}

impl GameSession {
    /// Build a session in the `Setup` status with an empty ledger.
    pub fn new(name: String, course: Vec<Bar>, players: Vec<Player>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: SystemTime::now(),
            course,
            players,
            scores: Vec::new(),
            current_hole_index: 0,
            status: SessionStatus::Setup,
        }
    }

    /// Hole the pointer currently designates.
    pub fn current_hole(&self) -> Option<&Bar> {
        self.course.get(self.current_hole_index)
    }

    /// Index of the final hole of the course.
    pub fn last_hole_index(&self) -> usize {
        self.course.len().saturating_sub(1)
    }

    /// Whether the pointer sits on the final hole.
    pub fn is_last_hole(&self) -> bool {
        self.current_hole_index >= self.last_hole_index()
    }

    /// Look up a roster entry.
    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == player_id)
    }

    /// Whether the id belongs to the roster.
    pub fn has_player(&self, player_id: PlayerId) -> bool {
        self.player(player_id).is_some()
    }

    /// Number of ledger entries recorded at the given hole.
    pub fn entries_at(&self, hole_id: &str) -> usize {
        self.scores
            .iter()
            .filter(|score| score.hole_id == hole_id)
            .count()
    }
}

impl From<BarEntity> for Bar {
    fn from(value: BarEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            neighborhood: value.neighborhood,
            address: value.address,
            par: value.par,
            latitude: value.latitude,
            longitude: value.longitude,
            bonus_task: value.bonus_task,
        }
    }
}

impl From<Bar> for BarEntity {
    fn from(value: Bar) -> Self {
        Self {
            id: value.id,
            name: value.name,
            neighborhood: value.neighborhood,
            address: value.address,
            par: value.par,
            latitude: value.latitude,
            longitude: value.longitude,
            bonus_task: value.bonus_task,
        }
    }
}

impl From<PlayerEntity> for Player {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            color: value.color,
        }
    }
}

impl From<Player> for PlayerEntity {
    fn from(value: Player) -> Self {
        Self {
            id: value.id,
            name: value.name,
            color: value.color,
        }
    }
}

impl From<ScoreEntity> for Score {
    fn from(value: ScoreEntity) -> Self {
        Self {
            player_id: value.player_id,
            hole_id: value.bar_id,
            strokes: value.strokes,
            recorded_at: value.timestamp,
            bonus_completed: value.bonus_completed,
        }
    }
}

impl From<Score> for ScoreEntity {
    fn from(value: Score) -> Self {
        Self {
            player_id: value.player_id,
            bar_id: value.hole_id,
            strokes: value.strokes,
            timestamp: value.recorded_at,
            bonus_completed: value.bonus_completed,
        }
    }
}

impl From<SessionEntity> for GameSession {
    fn from(value: SessionEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            created_at: value.date,
            course: value.course.into_iter().map(Into::into).collect(),
            players: value.players.into_iter().map(Into::into).collect(),
            scores: value.scores.into_iter().map(Into::into).collect(),
            current_hole_index: value.current_hole_index,
            status: value.status,
        }
    }
}

impl From<GameSession> for SessionEntity {
    fn from(value: GameSession) -> Self {
        Self {
            id: value.id,
            name: value.name,
            date: value.created_at,
            course: value.course.into_iter().map(Into::into).collect(),
            players: value.players.into_iter().map(Into::into).collect(),
            scores: value.scores.into_iter().map(Into::into).collect(),
            current_hole_index: value.current_hole_index,
            status: value.status,
        }
    }
}
