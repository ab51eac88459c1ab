use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::session::{BarView, SessionStatusDto};

/// Sip count for one roster player, sent as the `sips` multipart field (JSON array).
///
/// Players missing from the array count as zero.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PlayerSipsInput {
    pub player_id: Uuid,
    pub sips: u32,
}

/// Multipart form of the hole submission, documented for OpenAPI only.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitHoleForm {
    /// JSON array of [`PlayerSipsInput`].
    sips: String,
    /// `true` when the team completed the bonus task.
    bonus_completed: Option<bool>,
    /// Team photo.
    #[schema(value_type = String, format = Binary)]
    photo: Vec<u8>,
}

/// Outcome of a hole submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitHoleResponse {
    pub session_id: Uuid,
    /// Hole the entries were recorded at.
    pub hole_id: String,
    /// Number of ledger entries written; players with zero sips are skipped.
    pub appended: usize,
    /// Public URL of the photo when the cloud upload succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub status: SessionStatusDto,
    pub current_hole_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hole: Option<BarView>,
}
