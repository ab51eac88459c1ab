//! Bodies of the `/api/*` relay endpoints.
//!
//! These keep the camelCase field names the web client already sends.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use crate::{
    dto::validation::validate_currency,
    state::relay::{PlayerSips, TeamScore},
};

/// Sips of one player inside a team score.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerSipsDto {
    pub name: String,
    pub sips: u32,
}

impl From<PlayerSipsDto> for PlayerSips {
    fn from(value: PlayerSipsDto) -> Self {
        Self {
            name: value.name,
            sips: value.sips,
        }
    }
}

impl From<PlayerSips> for PlayerSipsDto {
    fn from(value: PlayerSips) -> Self {
        Self {
            name: value.name,
            sips: value.sips,
        }
    }
}

/// Team score as stored by the save-score relay.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamScoreDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub game_name: String,
    pub bar_id: String,
    pub bar_name: String,
    pub timestamp: i64,
    pub players: Vec<PlayerSipsDto>,
    pub bonus_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl From<TeamScore> for TeamScoreDto {
    fn from(value: TeamScore) -> Self {
        Self {
            id: value.id,
            game_name: value.game_name,
            bar_id: value.bar_id,
            bar_name: value.bar_name,
            timestamp: value.timestamp,
            players: value.players.into_iter().map(Into::into).collect(),
            bonus_completed: value.bonus_completed,
            photo_url: value.photo_url,
        }
    }
}

/// Body of `POST /api/save-score`. `gameName`, `barId` and `players` are mandatory.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveScoreRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub bar_id: Option<String>,
    #[serde(default)]
    pub bar_name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub players: Option<Vec<PlayerSipsDto>>,
    #[serde(default)]
    pub bonus_completed: bool,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Answer of `POST /api/save-score`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveScoreResponse {
    pub success: bool,
    pub message: String,
    pub data: TeamScoreDto,
}

/// Answer of `GET /api/save-score`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreListResponse {
    pub success: bool,
    pub data: Vec<TeamScoreDto>,
}

/// Query of `GET /api/save-score`. `gameId` is matched against the game name.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ScoreQuery {
    #[serde(default)]
    pub game_id: Option<String>,
}

/// Answer of `POST /api/upload-image`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponse {
    pub success: bool,
    pub photo_url: String,
}

/// Body of `POST /api/create-payment-intent`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentIntentRequest {
    /// Amount in the currency's minor unit.
    #[serde(default)]
    pub amount: Option<u64>,
    /// Defaults to `usd`.
    #[serde(default)]
    pub currency: Option<String>,
    /// Defaults to `Pub Golf Bar Payment`.
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for CreatePaymentIntentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(ref currency) = self.currency {
            if let Err(e) = validate_currency(currency) {
                errors.add("currency", e);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Answer of `POST /api/create-payment-intent`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_score_request_reads_camel_case() {
        let request: SaveScoreRequest = serde_json::from_str(
            r#"{
                "gameName": "Friday",
                "barId": "bar-2",
                "barName": "Doc Holliday's",
                "timestamp": 1700000000000,
                "players": [{ "name": "Alice", "sips": 2 }],
                "bonusCompleted": true
            }"#,
        )
        .unwrap();
        assert_eq!(request.game_name.as_deref(), Some("Friday"));
        assert_eq!(request.players.as_ref().map(Vec::len), Some(1));
        assert!(request.bonus_completed);
        assert!(request.photo_url.is_none());
    }

    #[test]
    fn payment_currency_must_be_iso_code() {
        let request = CreatePaymentIntentRequest {
            amount: Some(500),
            currency: Some("dollars".into()),
            description: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn upload_response_uses_camel_case() {
        let json = serde_json::to_value(UploadImageResponse {
            success: true,
            photo_url: "/uploads/a.png".into(),
        })
        .unwrap();
        assert_eq!(json["photoUrl"], "/uploads/a.png");
    }
}
