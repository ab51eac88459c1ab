use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        leaderboard::{LeaderboardResponse, PlayerScoreResponse},
        session::{
            AdvanceResponse, AppendScoresRequest, AppendScoresResponse, CreateSessionRequest,
            SelectCurrentRequest, SessionDetail, SessionSummary, StatusResponse,
            StatusUpdateRequest,
        },
        submission::{PlayerSipsInput, SubmitHoleForm, SubmitHoleResponse},
    },
    error::AppError,
    services::{
        game_service,
        submission_service::{self, HoleSubmission, PhotoUpload},
    },
    state::SharedState,
};

/// Session lifecycle, scoring and leaderboard routes.
///
/// `upload_limit` caps the body of the multipart hole submission.
pub fn router(upload_limit: usize) -> Router<SharedState> {
    Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/sessions/current", get(current_session).put(select_current))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/scores", post(append_scores))
        .route("/sessions/{id}/advance", post(advance_hole))
        .route("/sessions/{id}/status", put(set_status))
        .route("/sessions/{id}/leaderboard", get(leaderboard))
        .route(
            "/sessions/{id}/players/{player_id}/score",
            get(player_score),
        )
        .route(
            "/sessions/{id}/holes/current/submit",
            post(submit_hole).layer(DefaultBodyLimit::max(upload_limit)),
        )
}

/// Start a new game; it becomes the current session.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = SessionDetail),
        (status = 400, description = "Empty name, course or roster, or limits exceeded")
    )
)]
pub async fn create_session(
    State(state): State<SharedState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionDetail>), AppError> {
    payload.validate()?;
    let detail = game_service::create_session(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Game history, oldest first.
#[utoipa::path(
    get,
    path = "/sessions",
    tag = "sessions",
    responses((status = 200, description = "Every session", body = [SessionSummary]))
)]
pub async fn list_sessions(State(state): State<SharedState>) -> Json<Vec<SessionSummary>> {
    Json(game_service::list_sessions(&state).await)
}

/// Retrieve a session with its course, roster and ledger.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session", body = SessionDetail),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionDetail>, AppError> {
    Ok(Json(game_service::get_session(&state, id).await?))
}

/// Delete a session.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn delete_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    game_service::delete_session(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Session the active screens follow.
#[utoipa::path(
    get,
    path = "/sessions/current",
    tag = "sessions",
    responses(
        (status = 200, description = "Current session", body = SessionDetail),
        (status = 404, description = "No current session")
    )
)]
pub async fn current_session(
    State(state): State<SharedState>,
) -> Result<Json<SessionDetail>, AppError> {
    game_service::current_session(&state)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("no current session".into()))
}

/// Point the active screens at another session, or clear the pointer.
#[utoipa::path(
    put,
    path = "/sessions/current",
    tag = "sessions",
    request_body = SelectCurrentRequest,
    responses(
        (status = 200, description = "Session now current, or null when cleared", body = SessionDetail),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn select_current(
    State(state): State<SharedState>,
    Json(payload): Json<SelectCurrentRequest>,
) -> Result<Json<Option<SessionDetail>>, AppError> {
    Ok(Json(
        game_service::select_current(&state, payload.session_id).await?,
    ))
}

/// Append raw ledger entries at the current hole.
#[utoipa::path(
    post,
    path = "/sessions/{id}/scores",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = AppendScoresRequest,
    responses(
        (status = 200, description = "Entries appended", body = AppendScoresResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn append_scores(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AppendScoresRequest>,
) -> Result<Json<AppendScoresResponse>, AppError> {
    Ok(Json(game_service::append_scores(&state, id, payload).await?))
}

/// Move the hole pointer forward; a no-op on the last hole.
#[utoipa::path(
    post,
    path = "/sessions/{id}/advance",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Pointer after the move", body = AdvanceResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn advance_hole(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdvanceResponse>, AppError> {
    Ok(Json(game_service::advance_hole(&state, id).await?))
}

/// Move the session status forward.
#[utoipa::path(
    put,
    path = "/sessions/{id}/status",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = StatusResponse),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Backward transition")
    )
)]
pub async fn set_status(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    Ok(Json(
        game_service::set_status(&state, id, payload.status).await?,
    ))
}

/// Ranked leaderboard, lowest total first.
#[utoipa::path(
    get,
    path = "/sessions/{id}/leaderboard",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Leaderboard", body = LeaderboardResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    Ok(Json(game_service::leaderboard(&state, id).await?))
}

/// Total score of a single player.
#[utoipa::path(
    get,
    path = "/sessions/{id}/players/{player_id}/score",
    tag = "sessions",
    params(
        ("id" = Uuid, Path, description = "Session identifier"),
        ("player_id" = Uuid, Path, description = "Player identifier")
    ),
    responses(
        (status = 200, description = "Player total", body = PlayerScoreResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn player_score(
    State(state): State<SharedState>,
    Path((id, player_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PlayerScoreResponse>, AppError> {
    Ok(Json(
        game_service::player_score(&state, id, player_id).await?,
    ))
}

/// Submit the current hole for the whole team: sips, bonus flag and the team photo.
#[utoipa::path(
    post,
    path = "/sessions/{id}/holes/current/submit",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body(content = SubmitHoleForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Hole recorded", body = SubmitHoleResponse),
        (status = 400, description = "Missing photo or malformed sips"),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session not in progress"),
        (status = 413, description = "Body larger than the configured upload limit")
    )
)]
pub async fn submit_hole(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SubmitHoleResponse>, AppError> {
    let mut submission = HoleSubmission {
        sips: Vec::new(),
        bonus_completed: false,
        photo: None,
    };

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("sips") => {
                let text = field.text().await?;
                submission.sips = serde_json::from_str::<Vec<PlayerSipsInput>>(&text)
                    .map_err(|err| AppError::BadRequest(format!("invalid `sips` field: {err}")))?;
            }
            Some("bonus_completed") | Some("bonusCompleted") => {
                submission.bonus_completed = parse_flag(&field.text().await?)?;
            }
            Some("photo") => {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    submission.photo = Some(PhotoUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(Json(
        submission_service::submit_hole(&state, id, submission).await?,
    ))
}

fn parse_flag(value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        other => Err(AppError::BadRequest(format!(
            "invalid `bonus_completed` value `{other}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{config::AppConfig, state::AppState};

    fn app() -> (SharedState, Router) {
        app_with(AppConfig::default())
    }

    fn app_with(config: AppConfig) -> (SharedState, Router) {
        let limit = config.max_upload_bytes();
        let state = AppState::new(config);
        let app = router(limit).with_state(state.clone());
        (state, app)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn create_body() -> Value {
        json!({
            "name": "Friday crawl",
            "course": [{ "id": "bar-1" }, { "id": "taco", "name": "Taco Stop", "par": 0 }],
            "players": [{ "name": "Alice" }, { "name": "Bob" }]
        })
    }

    fn multipart_request(uri: &str, sips: Value, bonus: bool, photo: Option<&[u8]>) -> Request<Body> {
        let boundary = "pubgolfboundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"sips\"\r\n\r\n{sips}\r\n\
             --{boundary}\r\nContent-Disposition: form-data; name=\"bonus_completed\"\r\n\r\n{bonus}\r\n"
        )
        .into_bytes();
        if let Some(photo) = photo {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"team.jpg\"\r\n\
                     Content-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(photo);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn create_then_fetch_current() {
        let (_, app) = app();
        let (status, created) = send(&app, json_request("POST", "/sessions", create_body())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "in-progress");
        assert_eq!(created["course"][1]["par"], 0);

        let (status, current) = send(
            &app,
            Request::get("/sessions/current").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(current["id"], created["id"]);
    }

    #[tokio::test]
    async fn empty_roster_is_a_bad_request() {
        let (state, app) = app();
        let mut body = create_body();
        body["players"] = json!([]);
        let (status, error) = send(&app, json_request("POST", "/sessions", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["error"].as_str().unwrap().contains("player"));
        assert!(state.sessions().read().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (_, app) = app();
        let uri = format!("/sessions/{}/advance", Uuid::new_v4());
        let (status, error) = send(
            &app,
            Request::post(uri.as_str()).body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(error["error"].is_string());
    }

    #[tokio::test]
    async fn backward_status_is_a_conflict() {
        let (_, app) = app();
        let (_, created) = send(&app, json_request("POST", "/sessions", create_body())).await;
        let uri = format!("/sessions/{}/status", created["id"].as_str().unwrap());

        let (status, _) = send(
            &app,
            json_request("PUT", &uri, json!({ "status": "completed" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            json_request("PUT", &uri, json!({ "status": "in-progress" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn submit_hole_records_and_advances() {
        let (_, app) = app();
        let (_, created) = send(&app, json_request("POST", "/sessions", create_body())).await;
        let id = created["id"].as_str().unwrap().to_string();
        let alice = created["players"][0]["id"].clone();
        let bob = created["players"][1]["id"].clone();
        let uri = format!("/sessions/{id}/holes/current/submit");
        let sips = json!([{ "player_id": alice, "sips": 3 }, { "player_id": bob, "sips": 0 }]);

        let (status, _) = send(&app, multipart_request(&uri, sips.clone(), true, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, submitted) = send(&app, multipart_request(&uri, sips, true, Some(&b"JPEGDATA"[..]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(submitted["appended"], 1);
        assert_eq!(submitted["current_hole_index"], 1);
        assert_eq!(submitted["next_hole"]["id"], "taco");

        let (_, board) = send(
            &app,
            Request::get(format!("/sessions/{id}/leaderboard").as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(board["total_par"], 3);
        assert_eq!(board["entries"][0]["player"]["id"], bob);
        assert_eq!(board["entries"][1]["total_score"], 2);
    }

    #[tokio::test]
    async fn phone_sized_photo_is_accepted() {
        let (_, app) = app();
        let (_, created) = send(&app, json_request("POST", "/sessions", create_body())).await;
        let id = created["id"].as_str().unwrap().to_string();
        let alice = created["players"][0]["id"].clone();
        let uri = format!("/sessions/{id}/holes/current/submit");
        let photo = vec![0xFFu8; 3 * 1024 * 1024];

        let (status, submitted) = send(
            &app,
            multipart_request(&uri, json!([{ "player_id": alice, "sips": 2 }]), false, Some(photo.as_slice())),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{submitted}");
        assert_eq!(submitted["appended"], 1);
        assert_eq!(submitted["current_hole_index"], 1);
    }

    #[tokio::test]
    async fn photo_over_the_upload_limit_is_too_large() {
        let (state, app) = app_with(AppConfig::default().with_max_upload_bytes(64 * 1024));
        let (_, created) = send(&app, json_request("POST", "/sessions", create_body())).await;
        let id = created["id"].as_str().unwrap().to_string();
        let uri = format!("/sessions/{id}/holes/current/submit");
        let photo = vec![0xFFu8; 128 * 1024];

        let (status, error) = send(&app, multipart_request(&uri, json!([]), false, Some(photo.as_slice()))).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(error["error"].is_string());

        let session_id: Uuid = id.parse().unwrap();
        let registry = state.sessions().read().await;
        assert_eq!(registry.get(session_id).unwrap().current_hole_index, 0);
    }

    #[test]
    fn flags_accept_form_spellings() {
        assert!(parse_flag("on").unwrap());
        assert!(!parse_flag("").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
