use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    routing::post,
};
use validator::Validate;

use crate::{
    dto::relay::{
        CreatePaymentIntentRequest, PaymentIntentResponse, SaveScoreRequest, SaveScoreResponse,
        ScoreListResponse, ScoreQuery, UploadImageResponse,
    },
    error::AppError,
    services::{relay_service, submission_service::PhotoUpload},
    state::SharedState,
};

/// Pass-through endpoints used by the web client; `upload_limit` caps the image upload body.
pub fn router(upload_limit: usize) -> Router<SharedState> {
    Router::new()
        .route("/api/save-score", post(save_score).get(list_scores))
        .route(
            "/api/upload-image",
            post(upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/create-payment-intent", post(create_payment_intent))
}

/// Append a team score to the server-side list.
#[utoipa::path(
    post,
    path = "/api/save-score",
    tag = "relay",
    request_body = SaveScoreRequest,
    responses(
        (status = 200, description = "Score saved", body = SaveScoreResponse),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn save_score(
    State(state): State<SharedState>,
    Json(payload): Json<SaveScoreRequest>,
) -> Result<Json<SaveScoreResponse>, AppError> {
    Ok(Json(relay_service::save_score(&state, payload)?))
}

/// List saved team scores, optionally for a single game name.
#[utoipa::path(
    get,
    path = "/api/save-score",
    tag = "relay",
    params(ScoreQuery),
    responses((status = 200, description = "Saved scores", body = ScoreListResponse))
)]
pub async fn list_scores(
    State(state): State<SharedState>,
    Query(query): Query<ScoreQuery>,
) -> Json<ScoreListResponse> {
    Json(relay_service::list_scores(&state, query.game_id.as_deref()))
}

/// Store a photo and echo its public path.
#[utoipa::path(
    post,
    path = "/api/upload-image",
    tag = "relay",
    request_body(content_type = "multipart/form-data", description = "`photo` file plus `gameId` and `barId` text fields"),
    responses(
        (status = 200, description = "Photo stored", body = UploadImageResponse),
        (status = 400, description = "No file uploaded"),
        (status = 413, description = "Body larger than the configured upload limit"),
        (status = 503, description = "Upload directory not writable")
    )
)]
pub async fn upload_image(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<UploadImageResponse>, AppError> {
    let mut game_id = None;
    let mut bar_id = None;
    let mut photo = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("gameId") => game_id = Some(field.text().await?),
            Some("barId") => bar_id = Some(field.text().await?),
            Some("photo") => {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    photo = Some(PhotoUpload {
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
        relay_service::upload_image(&state, game_id, bar_id, photo).await?,
    ))
}

/// Open a payment intent and return its client secret.
#[utoipa::path(
    post,
    path = "/api/create-payment-intent",
    tag = "relay",
    request_body = CreatePaymentIntentRequest,
    responses(
        (status = 200, description = "Intent created", body = PaymentIntentResponse),
        (status = 400, description = "Provider refused the request"),
        (status = 500, description = "Missing STRIPE_SECRET_KEY")
    )
)]
pub async fn create_payment_intent(
    State(state): State<SharedState>,
    Json(payload): Json<CreatePaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, AppError> {
    payload.validate()?;
    Ok(Json(
        relay_service::create_payment_intent(&state, payload).await?,
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{config::AppConfig, state::AppState};

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn app() -> Router {
        app_with(AppConfig::default())
    }

    fn app_with(config: AppConfig) -> Router {
        let limit = config.max_upload_bytes();
        router(limit).with_state(AppState::new(config))
    }

    #[tokio::test]
    async fn save_score_round_trip() {
        let app = app();
        let (status, error) = send(&app, post_json("/api/save-score", json!({ "barId": "bar-1" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "Missing required fields");

        let (status, saved) = send(
            &app,
            post_json(
                "/api/save-score",
                json!({
                    "gameName": "Friday",
                    "barId": "bar-1",
                    "barName": "Sing Sing Bar",
                    "timestamp": 1,
                    "players": [{ "name": "Alice", "sips": 2 }],
                    "bonusCompleted": false
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["success"], true);
        assert_eq!(saved["data"]["gameName"], "Friday");

        let (_, listed) = send(
            &app,
            Request::get("/api/save-score?gameId=Friday")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(listed["data"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn payment_without_key_is_a_server_error() {
        let (status, error) = send(
            &app(),
            post_json("/api/create-payment-intent", json!({ "amount": 500 })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error["error"], "Missing STRIPE_SECRET_KEY");
    }

    #[tokio::test]
    async fn upload_without_photo_is_rejected() {
        let boundary = "relayboundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"gameId\"\r\n\r\ng1\r\n--{boundary}--\r\n"
        );
        let request = Request::post("/api/upload-image")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, error) = send(&app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "No file uploaded");
    }

    #[tokio::test]
    async fn upload_over_the_limit_is_too_large() {
        let boundary = "relayboundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"big.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(&vec![0xFFu8; 32 * 1024]);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        let request = Request::post("/api/upload-image")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let app = app_with(AppConfig::default().with_max_upload_bytes(8 * 1024));
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
