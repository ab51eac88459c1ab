use std::time::SystemTime;

use tracing::{error, info, warn};

use crate::{
    dao::{payments::PaymentIntentRequest, photos::PhotoObject},
    dto::{
        relay::{
            CreatePaymentIntentRequest, PaymentIntentResponse, SaveScoreRequest,
            SaveScoreResponse, ScoreListResponse, TeamScoreDto, UploadImageResponse,
        },
        unix_millis,
    },
    error::ServiceError,
    services::submission_service::{PhotoUpload, photo_extension},
    state::{SharedState, relay::TeamScore},
};

const DEFAULT_CURRENCY: &str = "usd";
const DEFAULT_PAYMENT_DESCRIPTION: &str = "Pub Golf Bar Payment";

/// Append a team score to the in-memory relay list.
pub fn save_score(
    state: &SharedState,
    request: SaveScoreRequest,
) -> Result<SaveScoreResponse, ServiceError> {
    let SaveScoreRequest {
        id,
        game_name,
        bar_id,
        bar_name,
        timestamp,
        players,
        bonus_completed,
        photo_url,
    } = request;

    let (Some(game_name), Some(bar_id), Some(players)) = (
        game_name.filter(|name| !name.is_empty()),
        bar_id.filter(|bar| !bar.is_empty()),
        players,
    ) else {
        return Err(ServiceError::InvalidInput("Missing required fields".into()));
    };

    let score = TeamScore {
        id,
        game_name,
        bar_id,
        bar_name: bar_name.unwrap_or_default(),
        timestamp: timestamp.unwrap_or_else(|| unix_millis(SystemTime::now())),
        players: players.into_iter().map(Into::into).collect(),
        bonus_completed,
        photo_url,
    };
    state.relay().push(score.clone());
    info!(game = %score.game_name, bar_id = %score.bar_id, "relay score saved");

    Ok(SaveScoreResponse {
        success: true,
        message: "Score saved successfully".into(),
        data: score.into(),
    })
}

/// Relay scores, optionally restricted to one game name.
pub fn list_scores(state: &SharedState, game_name: Option<&str>) -> ScoreListResponse {
    let scores = match game_name {
        Some(name) => state.relay().for_game(name),
        None => state.relay().all(),
    };
    ScoreListResponse {
        success: true,
        data: scores.into_iter().map(TeamScoreDto::from).collect(),
    }
}

/// Store an uploaded image under `{gameId}_{barId}_{millis}.{ext}` and return its URL.
pub async fn upload_image(
    state: &SharedState,
    game_id: Option<String>,
    bar_id: Option<String>,
    photo: Option<PhotoUpload>,
) -> Result<UploadImageResponse, ServiceError> {
    let Some(photo) = photo else {
        return Err(ServiceError::InvalidInput("No file uploaded".into()));
    };

    let extension = photo_extension(photo.file_name.as_deref(), photo.content_type.as_deref());
    let key = format!(
        "{}_{}_{}.{extension}",
        sanitize_segment(game_id.as_deref()),
        sanitize_segment(bar_id.as_deref()),
        unix_millis(SystemTime::now())
    );
    let object = PhotoObject {
        key,
        content_type: photo
            .content_type
            .unwrap_or_else(|| "application/octet-stream".into()),
        bytes: photo.bytes,
    };

    let photo_url = state.uploads().put(object).await.map_err(|err| {
        error!(error = %err, "failed to store uploaded image");
        ServiceError::from(err)
    })?;

    Ok(UploadImageResponse {
        success: true,
        photo_url,
    })
}

fn sanitize_segment(value: Option<&str>) -> String {
    let value: String = value
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if value.is_empty() {
        "undefined".into()
    } else {
        value
    }
}

/// Open a payment intent with the configured provider.
pub async fn create_payment_intent(
    state: &SharedState,
    request: CreatePaymentIntentRequest,
) -> Result<PaymentIntentResponse, ServiceError> {
    let Some(gateway) = state.payments() else {
        return Err(ServiceError::NotConfigured("Missing STRIPE_SECRET_KEY".into()));
    };
    let Some(amount) = request.amount.filter(|amount| *amount > 0) else {
        return Err(ServiceError::InvalidInput(
            "amount must be a positive integer in the currency's minor unit".into(),
        ));
    };

    let intent = PaymentIntentRequest {
        amount,
        currency: request
            .currency
            .map(|currency| currency.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.into()),
        description: request
            .description
            .filter(|description| !description.is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT_DESCRIPTION.into()),
    };

    match gateway.create_intent(intent).await {
        Ok(client_secret) => Ok(PaymentIntentResponse { client_secret }),
        Err(err) => {
            warn!(error = %err, "payment intent refused");
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::future::BoxFuture;
    use tempfile::tempdir;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::payments::{PaymentError, PaymentGateway},
        dto::relay::PlayerSipsDto,
        state::AppState,
    };

    struct EchoGateway;

    impl PaymentGateway for EchoGateway {
        fn create_intent(
            &self,
            request: PaymentIntentRequest,
        ) -> BoxFuture<'static, Result<String, PaymentError>> {
            Box::pin(async move {
                if request.currency == "xxx" {
                    return Err(PaymentError::Declined("Invalid currency: xxx".into()));
                }
                Ok(format!(
                    "pi_{}_{}_{}",
                    request.amount, request.currency, request.description
                ))
            })
        }
    }

    fn save_request(game: Option<&str>) -> SaveScoreRequest {
        SaveScoreRequest {
            id: None,
            game_name: game.map(Into::into),
            bar_id: Some("bar-1".into()),
            bar_name: Some("Sing Sing Bar".into()),
            timestamp: Some(10),
            players: Some(vec![PlayerSipsDto {
                name: "Alice".into(),
                sips: 2,
            }]),
            bonus_completed: false,
            photo_url: None,
        }
    }

    #[test]
    fn save_score_requires_game_bar_and_players() {
        let state = AppState::new(AppConfig::default());
        let err = save_score(&state, save_request(None)).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m == "Missing required fields"));

        save_score(&state, save_request(Some("Friday"))).unwrap();
        save_score(&state, save_request(Some("Saturday"))).unwrap();
        assert_eq!(list_scores(&state, Some("Friday")).data.len(), 1);
        assert_eq!(list_scores(&state, None).data.len(), 2);
        assert!(list_scores(&state, Some("Sunday")).data.is_empty());
    }

    #[tokio::test]
    async fn upload_writes_file_under_uploads_dir() {
        let dir = tempdir().unwrap();
        let state = AppState::new(AppConfig::default().with_data_root(dir.path()));

        let response = upload_image(
            &state,
            Some("game-1".into()),
            Some("bar-2".into()),
            Some(PhotoUpload {
                file_name: None,
                content_type: Some("image/png".into()),
                bytes: vec![7, 7],
            }),
        )
        .await
        .unwrap();
        assert!(response.photo_url.starts_with("/uploads/game-1_bar-2_"));
        assert!(response.photo_url.ends_with(".png"));

        let err = upload_image(&state, None, None, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m == "No file uploaded"));
    }

    #[tokio::test]
    async fn payment_defaults_and_errors() {
        let unconfigured = AppState::new(AppConfig::default());
        let request = || CreatePaymentIntentRequest {
            amount: Some(1500),
            currency: None,
            description: None,
        };
        let err = create_payment_intent(&unconfigured, request())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotConfigured(_)));

        let state = AppState::builder(AppConfig::default())
            .payments(Arc::new(EchoGateway))
            .build();
        let response = create_payment_intent(&state, request()).await.unwrap();
        assert_eq!(response.client_secret, "pi_1500_usd_Pub Golf Bar Payment");

        let mut declined = request();
        declined.currency = Some("XXX".into());
        let err = create_payment_intent(&state, declined).await.unwrap_err();
        assert!(matches!(err, ServiceError::Rejected(ref m) if m == "Invalid currency: xxx"));
    }
}
