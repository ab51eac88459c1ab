use tracing::warn;

use crate::{
    dto::health::{CollaboratorStatus, HealthResponse},
    state::SharedState,
};

/// Report registry size and wired collaborators; degraded while snapshot writes fail.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let sessions = state.sessions().read().await.len();
    let collaborators = CollaboratorStatus {
        snapshot: state.snapshots().is_some(),
        cloud_mirror: state.mirror().is_some(),
        cloud_photos: state.cloud_photos().is_some(),
        payments: state.payments().is_some(),
    };

    if state.is_snapshot_failing() {
        warn!("snapshot writes failing (degraded mode)");
        HealthResponse::degraded(sessions, collaborators)
    } else {
        HealthResponse::ok(sessions, collaborators)
    }
}
