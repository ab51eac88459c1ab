use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Number of sessions held in memory.
    pub sessions: usize,
    /// Which optional collaborators are wired in.
    pub collaborators: CollaboratorStatus,
}

/// Presence of each optional collaborator.
#[derive(Debug, Serialize, ToSchema)]
pub struct CollaboratorStatus {
    /// Local snapshot store.
    pub snapshot: bool,
    /// Supabase `team_scores` mirror.
    pub cloud_mirror: bool,
    /// Supabase photo bucket.
    pub cloud_photos: bool,
    /// Stripe gateway.
    pub payments: bool,
}

impl HealthResponse {
    /// Every configured collaborator is reachable.
    pub fn ok(sessions: usize, collaborators: CollaboratorStatus) -> Self {
        Self {
            status: "ok".to_string(),
            sessions,
            collaborators,
        }
    }

    /// The game works but the local snapshot cannot be written.
    pub fn degraded(sessions: usize, collaborators: CollaboratorStatus) -> Self {
        Self {
            status: "degraded".to_string(),
            sessions,
            collaborators,
        }
    }
}
