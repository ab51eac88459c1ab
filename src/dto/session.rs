use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::{format_system_time, validation::validate_not_blank},
    state::{
        game::{Bar, GameSession, Player, Score},
        state_machine::SessionStatus,
    },
};

/// Payload used to start a new game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSessionRequest {
    pub name: String,
    /// Ordered course. Each stop references the built-in catalog, defines a bar inline, or both.
    #[validate(nested)]
    pub course: Vec<BarInput>,
    #[validate(nested)]
    pub players: Vec<PlayerInput>,
    /// Draw a random bonus task for every stop that does not define one.
    #[serde(default)]
    pub assign_bonus_tasks: bool,
}

/// Course stop supplied when creating a session.
///
/// When `id` matches a catalog bar, the catalog entry is used and any field given here
/// overrides it. Otherwise `name` and `par` are required.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BarInput {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub par: Option<u32>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub bonus_task: Option<String>,
}

impl Validate for BarInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_not_blank(&self.id) {
            errors.add("id", e);
        }
        if let Some(ref name) = self.name {
            if let Err(e) = validate_not_blank(name) {
                errors.add("name", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Roster entry supplied when creating a session. Ids and colors are assigned by the backend.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlayerInput {
    pub name: String,
}

impl Validate for PlayerInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_not_blank(&self.name) {
            errors.add("name", e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Wire form of [`SessionStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatusDto {
    Setup,
    InProgress,
    Completed,
}

impl From<SessionStatus> for SessionStatusDto {
    fn from(value: SessionStatus) -> Self {
        match value {
            SessionStatus::Setup => Self::Setup,
            SessionStatus::InProgress => Self::InProgress,
            SessionStatus::Completed => Self::Completed,
        }
    }
}

impl From<SessionStatusDto> for SessionStatus {
    fn from(value: SessionStatusDto) -> Self {
        match value {
            SessionStatusDto::Setup => Self::Setup,
            SessionStatusDto::InProgress => Self::InProgress,
            SessionStatusDto::Completed => Self::Completed,
        }
    }
}

/// Public projection of a course stop.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BarView {
    pub id: String,
    pub name: String,
    pub neighborhood: String,
    pub address: String,
    pub par: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus_task: Option<String>,
}

impl From<&Bar> for BarView {
    fn from(bar: &Bar) -> Self {
        Self {
            id: bar.id.clone(),
            name: bar.name.clone(),
            neighborhood: bar.neighborhood.clone(),
            address: bar.address.clone(),
            par: bar.par,
            latitude: bar.latitude,
            longitude: bar.longitude,
            bonus_task: bar.bonus_task.clone(),
        }
    }
}

/// Public projection of a roster entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerView {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            color: player.color.clone(),
        }
    }
}

/// One ledger entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScoreView {
    pub player_id: Uuid,
    pub hole_id: String,
    pub strokes: u32,
    pub bonus_completed: bool,
    pub recorded_at: String,
}

impl From<&Score> for ScoreView {
    fn from(score: &Score) -> Self {
        Self {
            player_id: score.player_id,
            hole_id: score.hole_id.clone(),
            strokes: score.strokes,
            bonus_completed: score.bonus_completed,
            recorded_at: format_system_time(score.recorded_at),
        }
    }
}

/// Compact session row used by the history listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSummary {
    pub id: Uuid,
    pub name: String,
    pub created_at: String,
    pub status: SessionStatusDto,
    pub current_hole_index: usize,
    pub hole_count: usize,
    pub player_count: usize,
    /// True when this session is the one the active views follow.
    pub is_current: bool,
}

impl SessionSummary {
    pub fn from_session(session: &GameSession, is_current: bool) -> Self {
        Self {
            id: session.id,
            name: session.name.clone(),
            created_at: format_system_time(session.created_at),
            status: session.status.into(),
            current_hole_index: session.current_hole_index,
            hole_count: session.course.len(),
            player_count: session.players.len(),
            is_current,
        }
    }
}

/// Full session aggregate.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDetail {
    pub id: Uuid,
    pub name: String,
    pub created_at: String,
    pub status: SessionStatusDto,
    pub current_hole_index: usize,
    /// Stop the pointer designates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_hole: Option<BarView>,
    pub course: Vec<BarView>,
    pub players: Vec<PlayerView>,
    pub scores: Vec<ScoreView>,
    pub is_current: bool,
}

impl SessionDetail {
    pub fn from_session(session: &GameSession, is_current: bool) -> Self {
        Self {
            id: session.id,
            name: session.name.clone(),
            created_at: format_system_time(session.created_at),
            status: session.status.into(),
            current_hole_index: session.current_hole_index,
            current_hole: session.current_hole().map(BarView::from),
            course: session.course.iter().map(BarView::from).collect(),
            players: session.players.iter().map(PlayerView::from).collect(),
            scores: session.scores.iter().map(ScoreView::from).collect(),
            is_current,
        }
    }
}

/// One raw ledger entry to append at the current hole.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScoreEntryInput {
    pub player_id: Uuid,
    pub strokes: u32,
    #[serde(default)]
    pub bonus_completed: bool,
}

/// Body of the append-scores route.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AppendScoresRequest {
    pub entries: Vec<ScoreEntryInput>,
}

/// Result of an append.
#[derive(Debug, Serialize, ToSchema)]
pub struct AppendScoresResponse {
    pub appended: usize,
    pub hole_id: String,
}

/// Hole pointer after an advance.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdvanceResponse {
    pub current_hole_index: usize,
    pub current_hole: Option<BarView>,
}

/// Requested status change.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    pub status: SessionStatusDto,
}

/// Status after a change.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub id: Uuid,
    pub status: SessionStatusDto,
}

/// Selects the session the active views follow. `null` clears the pointer.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectCurrentRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&SessionStatusDto::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let parsed: SessionStatusDto = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(SessionStatus::from(parsed), SessionStatus::Completed);
    }

    #[test]
    fn blank_player_name_is_rejected() {
        let request: CreateSessionRequest = serde_json::from_str(
            r#"{ "name": "Crawl", "course": [{ "id": "bar-1" }], "players": [{ "name": " " }] }"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
        assert!(!request.assign_bonus_tasks);
    }

    #[test]
    fn catalog_reference_needs_only_an_id() {
        let request: CreateSessionRequest = serde_json::from_str(
            r#"{ "name": "Crawl", "course": [{ "id": "bar-1" }], "players": [{ "name": "Alice" }] }"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert!(request.course[0].par.is_none());
    }
}
