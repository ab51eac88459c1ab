use tracing::info;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dto::{
        leaderboard::{LeaderboardResponse, PlayerScoreResponse},
        session::{
            AdvanceResponse, AppendScoresRequest, AppendScoresResponse, BarView,
            CreateSessionRequest, PlayerInput, SessionDetail, SessionStatusDto, SessionSummary,
            StatusResponse,
        },
    },
    error::ServiceError,
    services::{catalog_service, persistence_service},
    state::{
        SharedState,
        game::{Player, ScoreInput, SessionId},
        leaderboard,
    },
};

/// Assemble course and roster, start the session and make it current.
pub async fn create_session(
    state: &SharedState,
    request: CreateSessionRequest,
) -> Result<SessionDetail, ServiceError> {
    let CreateSessionRequest {
        name,
        course,
        players,
        assign_bonus_tasks,
    } = request;

    let course = catalog_service::resolve_course(course, assign_bonus_tasks)?;
    let players = build_players(state.config(), players);

    let detail = {
        let mut registry = state.sessions().write().await;
        let id = registry.create_session(&name, course, players)?;
        SessionDetail::from_session(registry.get(id)?, true)
    };
    info!(session_id = %detail.id, name = %detail.name, "session created");

    persistence_service::persist(state).await;
    Ok(detail)
}

fn build_players(config: &AppConfig, players: Vec<PlayerInput>) -> Vec<Player> {
    players
        .into_iter()
        .enumerate()
        .map(|(index, player)| Player {
            id: Uuid::new_v4(),
            name: player.name.trim().to_string(),
            color: config.color_for_index(index),
        })
        .collect()
}

/// Every session, oldest first.
pub async fn list_sessions(state: &SharedState) -> Vec<SessionSummary> {
    let registry = state.sessions().read().await;
    let current = registry.current_id();
    registry
        .sessions()
        .map(|session| SessionSummary::from_session(session, current == Some(session.id)))
        .collect()
}

/// Full aggregate of one session.
pub async fn get_session(state: &SharedState, id: SessionId) -> Result<SessionDetail, ServiceError> {
    let registry = state.sessions().read().await;
    let session = registry.get(id)?;
    Ok(SessionDetail::from_session(
        session,
        registry.current_id() == Some(id),
    ))
}

/// Remove a session from the collection.
pub async fn delete_session(state: &SharedState, id: SessionId) -> Result<(), ServiceError> {
    state.sessions().write().await.delete_session(id)?;
    info!(session_id = %id, "session deleted");
    persistence_service::persist(state).await;
    Ok(())
}

/// Session the active views follow, if any.
pub async fn current_session(state: &SharedState) -> Option<SessionDetail> {
    let registry = state.sessions().read().await;
    registry
        .current()
        .map(|session| SessionDetail::from_session(session, true))
}

/// Move the current pointer. `None` clears it.
pub async fn select_current(
    state: &SharedState,
    id: Option<SessionId>,
) -> Result<Option<SessionDetail>, ServiceError> {
    let detail = {
        let mut registry = state.sessions().write().await;
        registry.select_current(id)?;
        registry
            .current()
            .map(|session| SessionDetail::from_session(session, true))
    };
    persistence_service::persist(state).await;
    Ok(detail)
}

/// Append raw ledger entries at the current hole.
pub async fn append_scores(
    state: &SharedState,
    id: SessionId,
    request: AppendScoresRequest,
) -> Result<AppendScoresResponse, ServiceError> {
    let entries: Vec<ScoreInput> = request
        .entries
        .into_iter()
        .map(|entry| ScoreInput {
            player_id: entry.player_id,
            strokes: entry.strokes,
            bonus_completed: entry.bonus_completed,
        })
        .collect();

    let response = {
        let mut registry = state.sessions().write().await;
        let appended = registry.append_scores(id, &entries)?;
        let hole_id = registry
            .get(id)?
            .current_hole()
            .map(|bar| bar.id.clone())
            .unwrap_or_default();
        AppendScoresResponse { appended, hole_id }
    };

    persistence_service::persist(state).await;
    Ok(response)
}

/// Move to the next hole; stays on the last one.
pub async fn advance_hole(
    state: &SharedState,
    id: SessionId,
) -> Result<AdvanceResponse, ServiceError> {
    let response = {
        let mut registry = state.sessions().write().await;
        let current_hole_index = registry.advance_hole(id)?;
        AdvanceResponse {
            current_hole_index,
            current_hole: registry.get(id)?.current_hole().map(BarView::from),
        }
    };

    persistence_service::persist(state).await;
    Ok(response)
}

/// Move the session status forward.
pub async fn set_status(
    state: &SharedState,
    id: SessionId,
    status: SessionStatusDto,
) -> Result<StatusResponse, ServiceError> {
    let status = state
        .sessions()
        .write()
        .await
        .set_status(id, status.into())?;
    info!(session_id = %id, %status, "session status updated");

    persistence_service::persist(state).await;
    Ok(StatusResponse {
        id,
        status: status.into(),
    })
}

/// Ranked leaderboard of a session.
pub async fn leaderboard(
    state: &SharedState,
    id: SessionId,
) -> Result<LeaderboardResponse, ServiceError> {
    let registry = state.sessions().read().await;
    let entries = registry.leaderboard(id)?;
    let session = registry.get(id)?;
    Ok(LeaderboardResponse::build(
        session,
        leaderboard::total_par(&session.course),
        entries,
    ))
}

/// Total score of one player.
pub async fn player_score(
    state: &SharedState,
    id: SessionId,
    player_id: Uuid,
) -> Result<PlayerScoreResponse, ServiceError> {
    let total_score = state.sessions().read().await.player_score(id, player_id)?;
    Ok(PlayerScoreResponse {
        session_id: id,
        player_id,
        total_score,
    })
}
