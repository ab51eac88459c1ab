use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::cloud::{CloudGameItem, CloudScoreDto, LiveLeaderboardEntry, RecentPhotosQuery},
    services::cloud_service,
    state::SharedState,
};

/// Read-only views over the cloud mirror. Empty when the mirror is not configured.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/cloud/games", get(list_games))
        .route("/cloud/games/{game_id}/scores", get(game_scores))
        .route("/cloud/photos", get(recent_photos))
        .route("/cloud/leaderboard", get(live_leaderboard))
}

/// Games known to the mirror, newest first.
#[utoipa::path(
    get,
    path = "/cloud/games",
    tag = "cloud",
    responses((status = 200, description = "Distinct games", body = [CloudGameItem]))
)]
pub async fn list_games(State(state): State<SharedState>) -> Json<Vec<CloudGameItem>> {
    Json(cloud_service::all_games(&state).await)
}

/// Mirrored submissions of one game, in submission order.
#[utoipa::path(
    get,
    path = "/cloud/games/{game_id}/scores",
    tag = "cloud",
    params(("game_id" = String, Path, description = "Session identifier")),
    responses((status = 200, description = "Game submissions", body = [CloudScoreDto]))
)]
pub async fn game_scores(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
) -> Json<Vec<CloudScoreDto>> {
    Json(cloud_service::game_scores(&state, &game_id).await)
}

/// Gallery of the latest team photos.
#[utoipa::path(
    get,
    path = "/cloud/photos",
    tag = "cloud",
    params(RecentPhotosQuery),
    responses((status = 200, description = "Recent photos", body = [CloudScoreDto]))
)]
pub async fn recent_photos(
    State(state): State<SharedState>,
    Query(query): Query<RecentPhotosQuery>,
) -> Json<Vec<CloudScoreDto>> {
    Json(cloud_service::recent_photos(&state, query.limit).await)
}

/// Standings across every mirrored game.
#[utoipa::path(
    get,
    path = "/cloud/leaderboard",
    tag = "cloud",
    responses((status = 200, description = "Live leaderboard", body = [LiveLeaderboardEntry]))
)]
pub async fn live_leaderboard(State(state): State<SharedState>) -> Json<Vec<LiveLeaderboardEntry>> {
    Json(cloud_service::live_leaderboard(&state).await)
}
