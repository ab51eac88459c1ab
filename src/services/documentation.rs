use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Pub Golf Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sessions::create_session,
        crate::routes::sessions::list_sessions,
        crate::routes::sessions::get_session,
        crate::routes::sessions::delete_session,
        crate::routes::sessions::current_session,
        crate::routes::sessions::select_current,
        crate::routes::sessions::append_scores,
        crate::routes::sessions::advance_hole,
        crate::routes::sessions::set_status,
        crate::routes::sessions::leaderboard,
        crate::routes::sessions::player_score,
        crate::routes::sessions::submit_hole,
        crate::routes::catalog::list_bars,
        crate::routes::catalog::list_bonus_tasks,
        crate::routes::catalog::random_bonus_task,
        crate::routes::cloud::list_games,
        crate::routes::cloud::game_scores,
        crate::routes::cloud::recent_photos,
        crate::routes::cloud::live_leaderboard,
        crate::routes::relay::save_score,
        crate::routes::relay::list_scores,
        crate::routes::relay::upload_image,
        crate::routes::relay::create_payment_intent,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::CollaboratorStatus,
            crate::dto::session::CreateSessionRequest,
            crate::dto::session::BarInput,
            crate::dto::session::PlayerInput,
            crate::dto::session::SessionStatusDto,
            crate::dto::session::BarView,
            crate::dto::session::PlayerView,
            crate::dto::session::ScoreView,
            crate::dto::session::SessionSummary,
            crate::dto::session::SessionDetail,
            crate::dto::session::ScoreEntryInput,
            crate::dto::session::AppendScoresRequest,
            crate::dto::session::AppendScoresResponse,
            crate::dto::session::AdvanceResponse,
            crate::dto::session::StatusUpdateRequest,
            crate::dto::session::StatusResponse,
            crate::dto::session::SelectCurrentRequest,
            crate::dto::leaderboard::LeaderboardRow,
            crate::dto::leaderboard::LeaderboardResponse,
            crate::dto::leaderboard::PlayerScoreResponse,
            crate::dto::submission::PlayerSipsInput,
            crate::dto::submission::SubmitHoleForm,
            crate::dto::submission::SubmitHoleResponse,
            crate::dto::catalog::BonusTasksResponse,
            crate::dto::catalog::BonusTaskResponse,
            crate::dto::cloud::CloudScoreDto,
            crate::dto::cloud::LiveLeaderboardEntry,
            crate::dto::cloud::CloudGameItem,
            crate::dto::relay::PlayerSipsDto,
            crate::dto::relay::TeamScoreDto,
            crate::dto::relay::SaveScoreRequest,
            crate::dto::relay::SaveScoreResponse,
            crate::dto::relay::ScoreListResponse,
            crate::dto::relay::UploadImageResponse,
            crate::dto::relay::CreatePaymentIntentRequest,
            crate::dto::relay::PaymentIntentResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sessions", description = "Game sessions, scoring and leaderboards"),
        (name = "catalog", description = "Built-in bars and bonus tasks"),
        (name = "cloud", description = "Read-only views over the cloud score mirror"),
        (name = "relay", description = "Pass-through endpoints for scores, uploads and payments"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/healthcheck",
            "/sessions",
            "/sessions/{id}/holes/current/submit",
            "/catalog/bars",
            "/cloud/leaderboard",
            "/api/save-score",
        ] {
            assert!(
                paths.iter().any(|path| path.as_str() == expected),
                "missing {expected}"
            );
        }
    }
}
