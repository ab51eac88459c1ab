use std::{collections::HashMap, time::SystemTime};

use tracing::{debug, info, warn};

use crate::{
    dao::{
        models::{PlayerSipsEntity, TeamScoreRecord},
        photos::PhotoObject,
    },
    dto::{
        session::BarView,
        submission::{PlayerSipsInput, SubmitHoleResponse},
        unix_millis,
    },
    error::ServiceError,
    services::persistence_service,
    state::{
        SharedState,
        game::{PlayerId, ScoreInput, SessionId},
        state_machine::SessionStatus,
    },
};

/// Photo attached to a hole submission.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// File name reported by the client, used for the extension.
    pub file_name: Option<String>,
    /// MIME type reported by the client.
    pub content_type: Option<String>,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// Everything the team sends when leaving a bar.
#[derive(Debug, Clone)]
pub struct HoleSubmission {
    /// Sips per roster player; absent players drank nothing.
    pub sips: Vec<PlayerSipsInput>,
    /// Team-wide bonus flag, copied onto every entry of the submission.
    pub bonus_completed: bool,
    /// Team photo. Required.
    pub photo: Option<PhotoUpload>,
}

struct HoleContext {
    session_name: String,
    hole_id: String,
    hole_name: String,
    roster: Vec<(PlayerId, String)>,
}

/// Record the current hole for the whole team and move on.
///
/// The photo upload and the cloud mirror are best-effort: their failures are logged and the
/// local ledger is updated regardless. Entries are only written for players with at least one
/// sip. On the last hole the session is completed instead of advanced.
pub async fn submit_hole(
    state: &SharedState,
    id: SessionId,
    submission: HoleSubmission,
) -> Result<SubmitHoleResponse, ServiceError> {
    let HoleSubmission {
        sips,
        bonus_completed,
        photo,
    } = submission;

    let Some(photo) = photo else {
        return Err(ServiceError::InvalidInput(
            "a team photo is required before submitting the hole".into(),
        ));
    };

    let context = hole_context(state, id).await?;
    let sips = sips_per_player(id, &context, &sips);

    let photo_url = upload_photo(state, id, &context.hole_id, photo).await;

    let mirrored: Vec<PlayerSipsEntity> = context
        .roster
        .iter()
        .map(|(player_id, name)| PlayerSipsEntity {
            name: name.clone(),
            sips: sips.get(player_id).copied().unwrap_or(0),
        })
        .collect();
    let entries: Vec<ScoreInput> = context
        .roster
        .iter()
        .filter_map(|(player_id, _)| {
            let strokes = sips.get(player_id).copied().unwrap_or(0);
            (strokes > 0).then_some(ScoreInput {
                player_id: *player_id,
                strokes,
                bonus_completed,
            })
        })
        .collect();

    let response = {
        let mut registry = state.sessions().write().await;
        let session = registry.get(id)?;
        if session.current_hole().map(|bar| bar.id.as_str()) != Some(context.hole_id.as_str()) {
            return Err(ServiceError::InvalidState(format!(
                "hole `{}` is no longer the current hole",
                context.hole_id
            )));
        }
        let finishing = session.is_last_hole();

        let appended = registry.append_scores(id, &entries)?;
        if finishing {
            registry.set_status(id, SessionStatus::Completed)?;
        } else {
            registry.advance_hole(id)?;
        }

        let session = registry.get(id)?;
        SubmitHoleResponse {
            session_id: id,
            hole_id: context.hole_id.clone(),
            appended,
            photo_url: photo_url.clone(),
            status: session.status.into(),
            current_hole_index: session.current_hole_index,
            next_hole: (!finishing)
                .then(|| session.current_hole().map(BarView::from))
                .flatten(),
        }
    };
    info!(
        session_id = %id,
        hole_id = %context.hole_id,
        appended = response.appended,
        status = ?response.status,
        "hole submitted"
    );

    mirror_submission(
        state,
        TeamScoreRecord {
            id: None,
            game_id: id.to_string(),
            game_name: context.session_name,
            bar_id: context.hole_id,
            bar_name: context.hole_name,
            timestamp: unix_millis(SystemTime::now()),
            players: mirrored,
            bonus_completed,
            photo_url,
            created_at: None,
        },
    );

    persistence_service::persist(state).await;
    Ok(response)
}

async fn hole_context(state: &SharedState, id: SessionId) -> Result<HoleContext, ServiceError> {
    let registry = state.sessions().read().await;
    let session = registry.get(id)?;
    if session.status != SessionStatus::InProgress {
        return Err(ServiceError::InvalidState(format!(
            "session `{id}` is {}, holes can only be submitted while in progress",
            session.status
        )));
    }
    let hole = session.current_hole().ok_or_else(|| {
        ServiceError::InvalidState(format!("session `{id}` has no current hole"))
    })?;

    Ok(HoleContext {
        session_name: session.name.clone(),
        hole_id: hole.id.clone(),
        hole_name: hole.name.clone(),
        roster: session
            .players
            .iter()
            .map(|player| (player.id, player.name.clone()))
            .collect(),
    })
}

fn sips_per_player(
    id: SessionId,
    context: &HoleContext,
    input: &[PlayerSipsInput],
) -> HashMap<PlayerId, u32> {
    let mut sips = HashMap::with_capacity(input.len());
    for entry in input {
        if context.roster.iter().any(|(player_id, _)| *player_id == entry.player_id) {
            sips.insert(entry.player_id, entry.sips);
        } else {
            warn!(
                session_id = %id,
                player_id = %entry.player_id,
                "ignoring sips for a player outside the roster"
            );
        }
    }
    sips
}

async fn upload_photo(
    state: &SharedState,
    id: SessionId,
    hole_id: &str,
    photo: PhotoUpload,
) -> Option<String> {
    let Some(store) = state.cloud_photos() else {
        debug!(session_id = %id, "cloud photo storage not configured; skipping upload");
        return None;
    };

    let extension = photo_extension(photo.file_name.as_deref(), photo.content_type.as_deref());
    let object = PhotoObject {
        key: format!(
            "{id}/{hole_id}_{}.{extension}",
            unix_millis(SystemTime::now())
        ),
        content_type: photo
            .content_type
            .unwrap_or_else(|| "application/octet-stream".into()),
        bytes: photo.bytes,
    };

    match store.put(object).await {
        Ok(url) => Some(url),
        Err(err) => {
            warn!(session_id = %id, hole_id, error = %err, "photo upload failed; continuing without photo");
            None
        }
    }
}

fn mirror_submission(state: &SharedState, record: TeamScoreRecord) {
    let Some(mirror) = state.mirror() else {
        debug!(game_id = %record.game_id, "cloud mirror not configured; skipping");
        return;
    };

    tokio::spawn(async move {
        let game_id = record.game_id.clone();
        if let Err(err) = mirror.insert_score(record).await {
            warn!(game_id = %game_id, error = %err, "failed to mirror hole submission");
        }
    });
}

/// File extension for an uploaded photo: the file name's, else the MIME subtype, else `jpg`.
pub fn photo_extension(file_name: Option<&str>, content_type: Option<&str>) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext))
        .or_else(|| content_type.and_then(|mime| mime.split_once('/').map(|(_, sub)| sub)))
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "jpg".to_string())
}
